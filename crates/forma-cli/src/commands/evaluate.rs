use std::collections::BTreeMap;

use forma_core::enums::SchemaSource;
use forma_rules::{ConditionalState, ConstraintViolation, build_constraints, evaluate_fields};
use forma_schema::SchemaValidator;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::EvaluateArgs;
use crate::files;
use crate::output::output;

/// Conditional state and constraint violations of one field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    #[serde(flatten)]
    pub state: ConditionalState,
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub valid: bool,
    pub fields: BTreeMap<String, FieldReport>,
}

/// Handle `forma evaluate`.
pub fn handle(args: &EvaluateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args)?;
    output(&report, flags.format)
}

/// Hidden fields are not submitted, so their constraints are not checked.
pub fn run(args: &EvaluateArgs) -> anyhow::Result<EvaluationReport> {
    let validator = SchemaValidator::new()?;
    let value = files::read_document_value(&args.file)?;
    let doc = validator.validate_value(&value, SchemaSource::LocalFallback)?;
    let values = files::read_values(&args.values)?;

    let mut states = evaluate_fields(doc.fields(), &values);
    let mut fields = BTreeMap::new();
    for field in doc.fields() {
        let state = states.remove(&field.name).unwrap_or_default();
        let violations = if state.is_hidden {
            Vec::new()
        } else {
            build_constraints(field)?
                .with_required(state.is_required)
                .check(values.get(&field.name))
        };
        fields.insert(field.name.clone(), FieldReport { state, violations });
    }

    let valid = fields.values().all(|f| f.violations.is_empty());
    Ok(EvaluationReport { valid, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_rules::ViolationKind;
    use pretty_assertions::assert_eq;

    fn setup(values: &serde_json::Value) -> (tempfile::TempDir, EvaluateArgs) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("guardian.json");
        let doc = serde_json::json!({
            "entity": "guardian",
            "type": "form",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "form": {"fields": [
                {"name": "age", "type": "number", "validation": {"min": 0}},
                {"name": "guardianName", "type": "text",
                 "condition": {"field": "age", "op": "<", "value": 18, "action": "require"}},
                {"name": "school", "type": "text", "validation": {"minLength": 3},
                 "condition": {"field": "age", "op": ">=", "value": 18, "action": "hide"}}
            ]}
        });
        std::fs::write(&file, doc.to_string()).unwrap();
        let values_path = dir.path().join("values.json");
        std::fs::write(&values_path, values.to_string()).unwrap();
        let args = EvaluateArgs { file, values: values_path };
        (dir, args)
    }

    #[test]
    fn conditional_requirement_is_checked() {
        let (_dir, args) = setup(&serde_json::json!({"age": 12, "school": "ab"}));
        let report = run(&args).unwrap();

        assert!(!report.valid);
        let guardian = &report.fields["guardianName"];
        assert!(guardian.state.is_required);
        let kinds: Vec<_> = guardian.violations.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::Required]);
        let school: Vec<_> = report.fields["school"].violations.iter().map(|v| v.kind).collect();
        assert_eq!(school, vec![ViolationKind::MinLength]);
    }

    #[test]
    fn hidden_fields_skip_constraints() {
        let (_dir, args) = setup(&serde_json::json!({"age": 30, "school": "ab"}));
        let report = run(&args).unwrap();

        assert!(report.valid);
        assert!(report.fields["school"].state.is_hidden);
        assert!(report.fields["school"].violations.is_empty());
    }
}
