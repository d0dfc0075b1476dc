use forma_core::enums::SchemaSource;
use forma_schema::{SchemaError, SchemaValidator, ValidationIssue};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::files;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub source: SchemaSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub issues: Vec<ValidationIssue>,
}

/// Handle `forma validate`.
pub fn handle(args: &ValidateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args)?;
    if !(flags.quiet && report.valid) {
        output(&report, flags.format)?;
    }
    if !report.valid {
        anyhow::bail!("{} has {} issue(s)", args.file.display(), report.issues.len());
    }
    Ok(())
}

pub fn run(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    let source = if args.fallback {
        SchemaSource::LocalFallback
    } else {
        SchemaSource::Registry
    };
    let value = files::read_document_value(&args.file)?;
    let validator = SchemaValidator::new()?;

    match validator.validate_value(&value, source) {
        Ok(doc) => Ok(ValidationReport {
            valid: true,
            source,
            entity: Some(doc.entity),
            issues: Vec::new(),
        }),
        Err(SchemaError::ValidationFailed { issues }) => Ok(ValidationReport {
            valid: false,
            source,
            entity: value.get("entity").and_then(|e| e.as_str()).map(str::to_string),
            issues,
        }),
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_schema::IssueCode;
    use pretty_assertions::assert_eq;

    fn args_for(body: &serde_json::Value) -> (tempfile::TempDir, ValidateArgs) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.json");
        std::fs::write(&file, body.to_string()).unwrap();
        (dir, ValidateArgs { file, fallback: false })
    }

    #[test]
    fn reports_every_issue() {
        let (_dir, args) = args_for(&serde_json::json!({
            "entity": "invoice",
            "type": "form",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "form": {"fields": [
                {"name": "currency", "type": "select"},
                {"name": "currency", "type": "text"}
            ]}
        }));

        let report = run(&args).unwrap();
        assert!(!report.valid);
        assert_eq!(report.entity.as_deref(), Some("invoice"));
        let codes: Vec<IssueCode> = report.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::OptionsRequired, IssueCode::DuplicateField]);
    }

    #[test]
    fn valid_document_passes() {
        let (_dir, args) = args_for(&serde_json::json!({
            "entity": "student",
            "type": "widget",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "widget": {"component": "StudentCard"}
        }));
        let report = run(&args).unwrap();
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }
}
