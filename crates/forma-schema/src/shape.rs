//! JSON shape check of raw documents.
//!
//! The schema is generated from [`SchemaDocument`] with
//! [`schemars::schema_for!`] and compiled once with `jsonschema`.

use forma_core::document::SchemaDocument;
use schemars::schema_for;

use crate::error::{IssueCode, SchemaError, ValidationIssue};

pub struct DocumentShape {
    validator: jsonschema::Validator,
}

impl DocumentShape {
    /// Generate and compile the document schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if the generated schema cannot be
    /// converted or compiled.
    pub fn new() -> Result<Self, SchemaError> {
        let schema = serde_json::to_value(schema_for!(SchemaDocument))
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| SchemaError::Generation(format!("{e}")))?;
        Ok(Self { validator })
    }

    /// Every shape error in `instance`.
    pub fn check(&self, instance: &serde_json::Value) -> Vec<ValidationIssue> {
        self.validator
            .iter_errors(instance)
            .map(|e| ValidationIssue::new(e.instance_path.to_string(), IssueCode::Shape, format!("{e}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_form() {
        let shape = DocumentShape::new().unwrap();
        let issues = shape.check(&serde_json::json!({
            "entity": "student",
            "type": "form",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "form": { "fields": [{ "name": "name", "type": "text" }] }
        }));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn reports_every_shape_error() {
        let shape = DocumentShape::new().unwrap();
        let issues = shape.check(&serde_json::json!({
            "entity": "student",
            "type": "spreadsheet",
            "minSupportedClient": "1.0.0",
            "form": { "fields": [{ "name": "name", "type": "hologram" }] }
        }));
        assert!(issues.len() >= 3, "{issues:?}");
        assert!(issues.iter().all(|i| i.code == IssueCode::Shape));
    }
}
