//! Schema validation error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors from validating or migrating a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document failed shape or structural validation. Every offending
    /// location is reported.
    #[error("Validation failed with {} issue(s): {}", issues.len(), summarize(issues))]
    ValidationFailed { issues: Vec<ValidationIssue> },

    /// The raw document is not JSON, or passed the shape check but still
    /// cannot be deserialized.
    #[error("Schema document is corrupted: {0}")]
    Corrupted(String),

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// A migration rule or target version is unusable.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl SchemaError {
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::ValidationFailed { issues } => issues,
            _ => &[],
        }
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What kind of rule a validation issue breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Shape,
    EmptyEntity,
    MissingPayload,
    ForeignPayload,
    DuplicateField,
    OptionsRequired,
    OptionsForbidden,
    DuplicateOption,
    MissingCustomComponent,
    InvalidPattern,
    InvalidBounds,
    StyleString,
    UnknownReference,
    ConditionConflict,
    SelfReference,
    MissingOperand,
    EmptyConditions,
    ExecutableValidator,
    EmptyColumns,
    DuplicateColumn,
}

/// One offending location in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON-pointer-like path to the offending node (`/form/fields/2/options`).
    pub path: String,
    /// Name of the field the issue belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: IssueCode,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            field: None,
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn for_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}
