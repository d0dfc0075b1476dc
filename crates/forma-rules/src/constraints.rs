//! Compiles a field's declarative validation block into an executable
//! constraint set.
//!
//! The set built here is the static floor. The live `is_required` computed
//! by the condition evaluator is layered on top with
//! [`ConstraintSet::with_required`] at render and submit time.

use std::sync::LazyLock;

use forma_core::enums::FieldKind;
use forma_core::field::{CustomValidator, FieldSchema};
use forma_core::value::FieldValue;
use regex::Regex;
use serde::Serialize;

use crate::error::RulesError;

const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";
const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    Email,
    NotANumber,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

/// Executable constraints of one field.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub field: String,
    kind: FieldKind,
    required: bool,
    required_message: String,
    min: Option<f64>,
    max: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    pattern_message: String,
    custom: Option<CustomValidator>,
}

/// Build the static constraint set of `field`.
///
/// # Errors
///
/// Returns [`RulesError::InvalidPattern`] if the declared pattern does not
/// compile.
pub fn build_constraints(field: &FieldSchema) -> Result<ConstraintSet, RulesError> {
    let validation = field.validation.clone().unwrap_or_default();

    let pattern = validation
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|source| RulesError::InvalidPattern {
            field: field.name.clone(),
            source,
        })?;

    Ok(ConstraintSet {
        field: field.name.clone(),
        kind: field.kind,
        required: validation.is_required(),
        required_message: validation
            .required_message
            .or(validation.required_message_key)
            .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string()),
        min: validation.min,
        max: validation.max,
        min_length: validation.min_length,
        max_length: validation.max_length,
        pattern,
        pattern_message: validation
            .pattern_message
            .or(validation.pattern_message_key)
            .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
        custom: validation.validate,
    })
}

impl ConstraintSet {
    /// Replace the static required flag with the live one.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Check `value` and return every violation. A blank, non-required
    /// value is accepted without running the other constraints.
    #[must_use]
    pub fn check(&self, value: Option<&FieldValue>) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        let Some(value) = value.filter(|v| !v.is_blank()) else {
            if self.required {
                violations.push(self.violation(ViolationKind::Required, self.required_message.clone()));
            }
            return violations;
        };

        if self.kind == FieldKind::Number || self.min.is_some() || self.max.is_some() {
            self.check_number(value, &mut violations);
        }
        self.check_length(value, &mut violations);

        if let Some(text) = value.as_str() {
            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(text) {
                    violations.push(self.violation(ViolationKind::Pattern, self.pattern_message.clone()));
                }
            }
            if self.kind == FieldKind::Email && !looks_like_email(text) {
                violations.push(self.violation(ViolationKind::Email, "Invalid email address".to_string()));
            }
        }

        if let Some(custom) = &self.custom {
            if let Err(message) = custom.call(Some(value)) {
                violations.push(self.violation(ViolationKind::Custom, message));
            }
        }

        violations
    }

    fn check_number(&self, value: &FieldValue, violations: &mut Vec<ConstraintViolation>) {
        let number = match value {
            FieldValue::Number(n) => Some(*n),
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = number else {
            if self.kind == FieldKind::Number {
                violations.push(self.violation(ViolationKind::NotANumber, "Must be a number".to_string()));
            }
            return;
        };
        if let Some(min) = self.min.filter(|min| number < *min) {
            violations.push(self.violation(ViolationKind::Min, format!("Must be at least {min}")));
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            violations.push(self.violation(ViolationKind::Max, format!("Must be at most {max}")));
        }
    }

    fn check_length(&self, value: &FieldValue, violations: &mut Vec<ConstraintViolation>) {
        let len = match value {
            FieldValue::String(s) => s.chars().count(),
            FieldValue::List(items) => items.len(),
            _ => return,
        };
        if let Some(min) = self.min_length.filter(|min| len < *min) {
            violations.push(self.violation(
                ViolationKind::MinLength,
                format!("Must be at least {min} characters"),
            ));
        }
        if let Some(max) = self.max_length.filter(|max| len > *max) {
            violations.push(self.violation(
                ViolationKind::MaxLength,
                format!("Must be at most {max} characters"),
            ));
        }
    }

    fn violation(&self, kind: ViolationKind, message: String) -> ConstraintViolation {
        ConstraintViolation {
            field: self.field.clone(),
            kind,
            message,
        }
    }
}

/// One `@`, a non-empty local part, and a dotted domain with no empty labels.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
});

fn looks_like_email(text: &str) -> bool {
    EMAIL.is_match(text)
}
