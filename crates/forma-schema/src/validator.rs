//! Structural validation of schema documents.
//!
//! Checks run in a fixed order and every issue is collected before the
//! verdict, so a rejected document reports all of its offending fields at
//! once:
//! 1. envelope and payload shape for the document `type`
//! 2. utility-class styling in display strings
//! 3. condition references to fields that do not exist
//! 4. `condition` and `conditions` declared together
//! 5. `setValue` writes back into the host field
//! 6. executable validators on documents that came from the registry

use std::collections::HashSet;

use forma_core::condition::{ActionBundle, ConditionRule};
use forma_core::document::SchemaDocument;
use forma_core::enums::{FieldKind, SchemaSource, SchemaType};
use forma_core::field::FieldSchema;

use crate::error::{IssueCode, SchemaError, ValidationIssue};
use crate::shape::DocumentShape;
use crate::style::StyleDetector;

/// Compiled validator: the generated JSON shape plus the style detector.
pub struct SchemaValidator {
    shape: DocumentShape,
    style: StyleDetector,
}

impl SchemaValidator {
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if the document schema or the
    /// style pattern cannot be compiled.
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            shape: DocumentShape::new()?,
            style: StyleDetector::new()?,
        })
    }

    /// Validate a typed document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] with every issue found.
    pub fn validate(&self, doc: &SchemaDocument, source: SchemaSource) -> Result<(), SchemaError> {
        let issues = self.structural_issues(doc, source);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { issues })
        }
    }

    /// Shape-check a raw document, deserialize it, then validate it.
    ///
    /// A JSON string is parsed first, so registry rows that store the
    /// document as text validate the same way.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] for shape or structural
    /// issues and [`SchemaError::Corrupted`] if the text is not JSON or a
    /// shape-valid value still fails to deserialize.
    pub fn validate_value(
        &self,
        value: &serde_json::Value,
        source: SchemaSource,
    ) -> Result<SchemaDocument, SchemaError> {
        if let serde_json::Value::String(text) = value {
            let parsed: serde_json::Value =
                serde_json::from_str(text).map_err(|e| SchemaError::Corrupted(e.to_string()))?;
            return self.validate_value(&parsed, source);
        }
        let shape_issues = self.shape.check(value);
        if !shape_issues.is_empty() {
            return Err(SchemaError::ValidationFailed {
                issues: shape_issues,
            });
        }
        let doc: SchemaDocument =
            serde_json::from_value(value.clone()).map_err(|e| SchemaError::Corrupted(e.to_string()))?;
        self.validate(&doc, source)?;
        Ok(doc)
    }

    fn structural_issues(&self, doc: &SchemaDocument, source: SchemaSource) -> Vec<ValidationIssue> {
        let mut issues = shape_issues(doc);
        issues.extend(self.style_issues(doc));
        issues.extend(reference_issues(doc, source));
        issues
    }

    fn style_issues(&self, doc: &SchemaDocument) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut check = |path: String, field: Option<&str>, text: &str| {
            if let Some(token) = self.style.find_utility(text) {
                let issue = ValidationIssue::new(
                    path,
                    IssueCode::StyleString,
                    format!("display string contains styling class '{token}'"),
                );
                issues.push(match field {
                    Some(name) => issue.for_field(name),
                    None => issue,
                });
            }
        };

        let prefix = fields_prefix(doc);
        for (i, field) in doc.fields().iter().enumerate() {
            for (slot, text) in field.ui.literals() {
                check(format!("{prefix}/{i}/ui/{slot}"), Some(&field.name), text);
            }
            for (j, option) in field.options.iter().flatten().enumerate() {
                if let Some(label) = &option.label {
                    check(format!("{prefix}/{i}/options/{j}/label"), Some(&field.name), label);
                }
            }
        }
        if let Some(label) = doc.form.as_ref().and_then(|f| f.submit.as_ref()).and_then(|s| s.label.as_deref()) {
            check("/form/submit/label".to_string(), None, label);
        }
        for (i, column) in doc.table.iter().flat_map(|t| t.columns.iter()).enumerate() {
            if let Some(label) = &column.label {
                check(format!("/table/columns/{i}/label"), None, label);
            }
        }
        for (i, section) in doc.detail.iter().flat_map(|d| d.sections.iter()).enumerate() {
            if let Some(title) = &section.title {
                check(format!("/detail/sections/{i}/title"), None, title);
            }
            for (j, field) in section.fields.iter().enumerate() {
                if let Some(label) = &field.label {
                    check(format!("/detail/sections/{i}/fields/{j}/label"), Some(&field.name), label);
                }
            }
        }
        issues
    }
}

/// Structural and cross-field issues of a typed document, excluding the
/// style-string check (which needs a compiled [`SchemaValidator`]).
#[must_use]
pub fn collect_issues(doc: &SchemaDocument, source: SchemaSource) -> Vec<ValidationIssue> {
    let mut issues = shape_issues(doc);
    issues.extend(reference_issues(doc, source));
    issues
}

fn shape_issues(doc: &SchemaDocument) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if doc.entity.trim().is_empty() {
        issues.push(ValidationIssue::new("/entity", IssueCode::EmptyEntity, "entity must not be empty"));
    }
    check_payload(doc, &mut issues);

    let prefix = fields_prefix(doc);
    let mut seen = HashSet::new();
    for (i, field) in doc.fields().iter().enumerate() {
        let path = format!("{prefix}/{i}");
        if !seen.insert(field.name.as_str()) {
            issues.push(
                ValidationIssue::new(
                    format!("{path}/name"),
                    IssueCode::DuplicateField,
                    format!("field name '{}' is declared more than once", field.name),
                )
                .for_field(&field.name),
            );
        }
        check_field_shape(field, &path, &mut issues);
    }

    if let Some(table) = &doc.table {
        if table.columns.is_empty() {
            issues.push(ValidationIssue::new(
                "/table/columns",
                IssueCode::EmptyColumns,
                "table must declare at least one column",
            ));
        }
        let mut keys = HashSet::new();
        for (i, column) in table.columns.iter().enumerate() {
            if !keys.insert(column.key.as_str()) {
                issues.push(ValidationIssue::new(
                    format!("/table/columns/{i}/key"),
                    IssueCode::DuplicateColumn,
                    format!("column key '{}' is declared more than once", column.key),
                ));
            }
        }
    }

    issues
}

/// Checks 3 to 6, each as its own pass over the fields so the issue list
/// follows the check order rather than the field order.
fn reference_issues(doc: &SchemaDocument, source: SchemaSource) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let prefix = fields_prefix(doc);
    let fields = doc.fields();
    let names: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let paths: Vec<String> = (0..fields.len()).map(|i| format!("{prefix}/{i}")).collect();

    for (field, path) in fields.iter().zip(&paths) {
        check_field_references(field, path, &names, &mut issues);
    }
    for (field, path) in fields.iter().zip(&paths) {
        check_field_conflict(field, path, &mut issues);
    }
    for (field, path) in fields.iter().zip(&paths) {
        check_field_writes(field, path, &names, &mut issues);
    }
    for (field, path) in fields.iter().zip(&paths) {
        check_field_executable(field, path, source, &mut issues);
    }
    issues
}

fn fields_prefix(doc: &SchemaDocument) -> &'static str {
    if doc.form.is_some() { "/form/fields" } else { "/filter/fields" }
}

fn check_payload(doc: &SchemaDocument, issues: &mut Vec<ValidationIssue>) {
    let present = doc.payload_types();
    if !present.contains(&doc.schema_type) {
        issues.push(ValidationIssue::new(
            format!("/{}", doc.schema_type),
            IssueCode::MissingPayload,
            format!("a {} document must carry a '{}' payload", doc.schema_type, doc.schema_type),
        ));
    }
    for foreign in present.into_iter().filter(|t| *t != doc.schema_type) {
        issues.push(ValidationIssue::new(
            format!("/{foreign}"),
            IssueCode::ForeignPayload,
            format!("a {} document must not carry a '{foreign}' payload", doc.schema_type),
        ));
    }
    if matches!(doc.schema_type, SchemaType::Form | SchemaType::Filter) && doc.fields().is_empty() {
        tracing::debug!(entity = %doc.entity, "document declares no fields");
    }
}

fn check_field_shape(field: &FieldSchema, path: &str, issues: &mut Vec<ValidationIssue>) {
    let push = |issues: &mut Vec<ValidationIssue>, suffix: &str, code: IssueCode, message: String| {
        issues.push(ValidationIssue::new(format!("{path}{suffix}"), code, message).for_field(&field.name));
    };

    let has_options = field.options.as_ref().is_some_and(|o| !o.is_empty());
    if field.kind.requires_options() && !has_options {
        push(
            issues,
            "/options",
            IssueCode::OptionsRequired,
            format!("{} field '{}' requires a non-empty options list", field.kind, field.name),
        );
    } else if field.options.is_some() && !field.kind.allows_options() {
        push(
            issues,
            "/options",
            IssueCode::OptionsForbidden,
            format!("{} field '{}' must not declare options", field.kind, field.name),
        );
    }

    if let Some(options) = &field.options {
        for (j, option) in options.iter().enumerate() {
            if options[..j].iter().any(|earlier| earlier.value == option.value) {
                push(
                    issues,
                    &format!("/options/{j}/value"),
                    IssueCode::DuplicateOption,
                    format!("option value '{}' is repeated", option.value),
                );
            }
        }
    }

    if field.kind == FieldKind::Custom
        && field.custom_component_type.as_deref().is_none_or(str::is_empty)
    {
        push(
            issues,
            "/customComponentType",
            IssueCode::MissingCustomComponent,
            format!("custom field '{}' must name a customComponentType", field.name),
        );
    }

    let Some(validation) = &field.validation else {
        return;
    };
    if let Some(pattern) = &validation.pattern {
        if let Err(e) = regex::Regex::new(pattern) {
            push(
                issues,
                "/validation/pattern",
                IssueCode::InvalidPattern,
                format!("pattern does not compile: {e}"),
            );
        }
    }
    if let (Some(min), Some(max)) = (validation.min_length, validation.max_length) {
        if min > max {
            push(
                issues,
                "/validation",
                IssueCode::InvalidBounds,
                format!("minLength {min} exceeds maxLength {max}"),
            );
        }
    }
    if let (Some(min), Some(max)) = (validation.min, validation.max) {
        if min > max {
            push(
                issues,
                "/validation",
                IssueCode::InvalidBounds,
                format!("min {min} exceeds max {max}"),
            );
        }
    }
}

fn check_field_executable(field: &FieldSchema, path: &str, source: SchemaSource, issues: &mut Vec<ValidationIssue>) {
    let has_executable = field.validation.as_ref().is_some_and(|v| v.validate.is_some());
    if has_executable && !source.allows_executable_validators() {
        issues.push(
            ValidationIssue::new(
                format!("{path}/validation/validate"),
                IssueCode::ExecutableValidator,
                "executable validators are only allowed on local fallback documents",
            )
            .for_field(&field.name),
        );
    }
}

fn check_field_conflict(field: &FieldSchema, path: &str, issues: &mut Vec<ValidationIssue>) {
    if field.condition.is_some() && field.conditions.is_some() {
        issues.push(
            ValidationIssue::new(
                path.to_string(),
                IssueCode::ConditionConflict,
                format!("field '{}' declares both condition and conditions", field.name),
            )
            .for_field(&field.name),
        );
    }
}

fn check_field_references(
    field: &FieldSchema,
    path: &str,
    names: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(rule) = &field.condition {
        check_rule(field, rule, &format!("{path}/condition"), names, issues);
    }

    if let Some(multi) = &field.conditions {
        let multi_path = format!("{path}/conditions");
        if multi.conditions.is_empty() {
            issues.push(
                ValidationIssue::new(
                    format!("{multi_path}/conditions"),
                    IssueCode::EmptyConditions,
                    "conditions must contain at least one rule",
                )
                .for_field(&field.name),
            );
        }
        for (k, rule) in multi.conditions.iter().enumerate() {
            check_rule(field, rule, &format!("{multi_path}/conditions/{k}"), names, issues);
        }
    }
}

fn check_field_writes(field: &FieldSchema, path: &str, names: &HashSet<&str>, issues: &mut Vec<ValidationIssue>) {
    if let Some(rule) = &field.condition {
        for bundle in rule.bundles() {
            check_bundle(field, bundle, &format!("{path}/condition"), names, issues);
        }
    }

    if let Some(multi) = &field.conditions {
        let multi_path = format!("{path}/conditions");
        for (k, rule) in multi.conditions.iter().enumerate() {
            let rule_path = format!("{multi_path}/conditions/{k}");
            for bundle in rule.bundles() {
                check_bundle(field, bundle, &rule_path, names, issues);
            }
        }
        for bundle in multi.bundles() {
            check_bundle(field, bundle, &multi_path, names, issues);
        }
    }
}

fn check_rule(
    host: &FieldSchema,
    rule: &ConditionRule,
    path: &str,
    names: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    if rule.field == host.name {
        issues.push(
            ValidationIssue::new(
                format!("{path}/field"),
                IssueCode::SelfReference,
                format!("condition of '{}' watches the field itself", host.name),
            )
            .for_field(&host.name),
        );
    } else if !names.contains(rule.field.as_str()) {
        issues.push(
            ValidationIssue::new(
                format!("{path}/field"),
                IssueCode::UnknownReference,
                format!("condition references unknown field '{}'", rule.field),
            )
            .for_field(&host.name),
        );
    }

    if rule.op.requires_value() && rule.value.is_none() {
        issues.push(
            ValidationIssue::new(
                format!("{path}/value"),
                IssueCode::MissingOperand,
                format!("operator '{}' requires a value", rule.op),
            )
            .for_field(&host.name),
        );
    }
}

fn check_bundle(
    host: &FieldSchema,
    bundle: &ActionBundle,
    path: &str,
    names: &HashSet<&str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(set_value) = &bundle.set_value else {
        return;
    };
    if set_value.field == host.name {
        issues.push(
            ValidationIssue::new(
                format!("{path}/setValue/field"),
                IssueCode::SelfReference,
                format!("setValue on '{}' writes back into its own field", host.name),
            )
            .for_field(&host.name),
        );
    } else if !names.contains(set_value.field.as_str()) {
        issues.push(
            ValidationIssue::new(
                format!("{path}/setValue/field"),
                IssueCode::UnknownReference,
                format!("setValue targets unknown field '{}'", set_value.field),
            )
            .for_field(&host.name),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_core::condition::{ActionBundle, MultiConditionRule, SetValue};
    use forma_core::enums::{ConditionOp, Logic};
    use forma_core::field::{CustomValidator, FieldOption, FieldValidation};
    use forma_core::value::FieldValue;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use semver::Version;
    use serde_json::json;

    fn form(fields: Vec<FieldSchema>) -> SchemaDocument {
        SchemaDocument::form("invoice", Version::new(1, 0, 0), fields)
    }

    fn codes(issues: &[ValidationIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    fn select(name: &str, values: &[&str]) -> FieldSchema {
        let mut field = FieldSchema::new(name, FieldKind::Select);
        field.options = Some(values.iter().map(|v| FieldOption::new(*v, *v)).collect());
        field
    }

    #[test]
    fn clean_form_passes() {
        let mut amount = FieldSchema::new("amount", FieldKind::Number);
        amount.condition = Some(ConditionRule::new("currency", ConditionOp::Exists, None));
        let doc = form(vec![select("currency", &["EUR", "USD"]), amount]);

        assert!(collect_issues(&doc, SchemaSource::Registry).is_empty());
        let validator = SchemaValidator::new().unwrap();
        validator.validate(&doc, SchemaSource::Registry).unwrap();
    }

    #[test]
    fn set_value_into_own_field_is_rejected() {
        let mut amount = FieldSchema::new("amount", FieldKind::Number);
        let mut rule = ConditionRule::new("currency", ConditionOp::Eq, Some("EUR".into()));
        rule.then = Some(ActionBundle {
            set_value: Some(SetValue {
                field: "amount".into(),
                value: FieldValue::Number(0.0),
            }),
            ..ActionBundle::default()
        });
        amount.condition = Some(rule);
        let doc = form(vec![select("currency", &["EUR"]), amount]);

        let issues = collect_issues(&doc, SchemaSource::Registry);
        assert_eq!(codes(&issues), vec![IssueCode::SelfReference]);
        assert_eq!(issues[0].field.as_deref(), Some("amount"));
        assert_eq!(issues[0].path, "/form/fields/1/condition/setValue/field");
    }

    #[test]
    fn condition_and_conditions_together_conflict() {
        let mut vat = FieldSchema::new("vat", FieldKind::Text);
        vat.condition = Some(ConditionRule::new("country", ConditionOp::Exists, None));
        vat.conditions = Some(MultiConditionRule {
            conditions: vec![ConditionRule::new("country", ConditionOp::Eq, Some("DE".into()))],
            logic: Logic::And,
            action: None,
            then: None,
            otherwise: None,
        });
        let doc = form(vec![FieldSchema::new("country", FieldKind::Text), vat]);

        let issues = collect_issues(&doc, SchemaSource::Registry);
        assert_eq!(codes(&issues), vec![IssueCode::ConditionConflict]);
    }

    #[test]
    fn every_issue_is_reported() {
        let mut ghost = FieldSchema::new("note", FieldKind::Text);
        ghost.condition = Some(ConditionRule::new("missing", ConditionOp::Gt, None));
        let doc = form(vec![
            FieldSchema::new("kind", FieldKind::Select),
            FieldSchema::new("kind", FieldKind::Text),
            ghost,
        ]);

        let issues = collect_issues(&doc, SchemaSource::Registry);
        assert_eq!(
            codes(&issues),
            vec![
                IssueCode::OptionsRequired,
                IssueCode::DuplicateField,
                IssueCode::UnknownReference,
                IssueCode::MissingOperand,
            ]
        );
    }

    #[rstest]
    #[case::text_with_options(FieldKind::Text, Some(vec!["a"]), Some(IssueCode::OptionsForbidden))]
    #[case::radio_without_options(FieldKind::Radio, None, Some(IssueCode::OptionsRequired))]
    #[case::multiselect_empty(FieldKind::Multiselect, Some(vec![]), Some(IssueCode::OptionsRequired))]
    #[case::repeated_value(FieldKind::Select, Some(vec!["a", "a"]), Some(IssueCode::DuplicateOption))]
    #[case::select_ok(FieldKind::Select, Some(vec!["a", "b"]), None)]
    fn options_rules(
        #[case] kind: FieldKind,
        #[case] values: Option<Vec<&str>>,
        #[case] expected: Option<IssueCode>,
    ) {
        let mut field = FieldSchema::new("choice", kind);
        field.options = values.map(|vs| vs.into_iter().map(|v| FieldOption::new(v, v)).collect());
        let issues = collect_issues(&form(vec![field]), SchemaSource::Registry);
        assert_eq!(codes(&issues), expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn custom_field_needs_component_type() {
        let doc = form(vec![FieldSchema::new("map", FieldKind::Custom)]);
        let issues = collect_issues(&doc, SchemaSource::Registry);
        assert_eq!(codes(&issues), vec![IssueCode::MissingCustomComponent]);
    }

    #[test]
    fn bad_pattern_and_bounds() {
        let mut field = FieldSchema::new("code", FieldKind::Text);
        field.validation = Some(FieldValidation {
            pattern: Some("([a-z".into()),
            min_length: Some(5),
            max_length: Some(2),
            ..FieldValidation::default()
        });
        let issues = collect_issues(&form(vec![field]), SchemaSource::Registry);
        assert_eq!(codes(&issues), vec![IssueCode::InvalidPattern, IssueCode::InvalidBounds]);
    }

    #[test]
    fn executable_validator_only_on_fallback() {
        let mut field = FieldSchema::new("iban", FieldKind::Text);
        field.validation = Some(FieldValidation {
            validate: Some(CustomValidator::new(|_| Ok(()))),
            ..FieldValidation::default()
        });
        let doc = form(vec![field]);

        assert_eq!(
            codes(&collect_issues(&doc, SchemaSource::Registry)),
            vec![IssueCode::ExecutableValidator]
        );
        assert!(collect_issues(&doc, SchemaSource::LocalFallback).is_empty());
    }

    #[test]
    fn issues_follow_check_order_not_field_order() {
        let mut total = FieldSchema::new("total", FieldKind::Number);
        total.validation = Some(FieldValidation {
            validate: Some(CustomValidator::new(|_| Ok(()))),
            ..FieldValidation::default()
        });

        let mut amount = FieldSchema::new("amount", FieldKind::Number);
        let mut rule = ConditionRule::new("country", ConditionOp::Eq, Some("DE".into()));
        rule.then = Some(ActionBundle {
            set_value: Some(SetValue {
                field: "amount".into(),
                value: FieldValue::Number(0.0),
            }),
            ..ActionBundle::default()
        });
        amount.condition = Some(rule);

        let mut vat = FieldSchema::new("vat", FieldKind::Text);
        vat.condition = Some(ConditionRule::new("amount", ConditionOp::Exists, None));
        vat.conditions = Some(MultiConditionRule {
            conditions: vec![ConditionRule::new("amount", ConditionOp::Exists, None)],
            logic: Logic::And,
            action: None,
            then: None,
            otherwise: None,
        });

        let mut note = FieldSchema::new("note", FieldKind::Text);
        note.ui.label = Some("Note text-sm".into());
        note.condition = Some(ConditionRule::new("ghost", ConditionOp::Exists, None));

        let country = FieldSchema::new("country", FieldKind::Select);
        let doc = form(vec![total, amount, vat, note, country]);

        let validator = SchemaValidator::new().unwrap();
        let err = validator.validate(&doc, SchemaSource::Registry).unwrap_err();
        assert_eq!(
            codes(err.issues()),
            vec![
                IssueCode::OptionsRequired,
                IssueCode::StyleString,
                IssueCode::UnknownReference,
                IssueCode::ConditionConflict,
                IssueCode::SelfReference,
                IssueCode::ExecutableValidator,
            ]
        );
        assert_eq!(err.issues()[5].path, "/form/fields/0/validation/validate");
    }

    #[test]
    fn foreign_payload_is_flagged() {
        let mut doc = form(vec![FieldSchema::new("q", FieldKind::Text)]);
        doc.schema_type = SchemaType::Filter;
        let issues = collect_issues(&doc, SchemaSource::Registry);
        assert_eq!(codes(&issues), vec![IssueCode::MissingPayload, IssueCode::ForeignPayload]);
    }

    #[test]
    fn styling_in_labels_is_rejected() {
        let mut name = FieldSchema::new("name", FieldKind::Text);
        name.ui.label = Some("Name text-sm".into());
        name.ui.placeholder = Some("Your full name".into());
        let validator = SchemaValidator::new().unwrap();

        let err = validator.validate(&form(vec![name]), SchemaSource::Registry).unwrap_err();
        assert_eq!(codes(err.issues()), vec![IssueCode::StyleString]);
        assert_eq!(err.issues()[0].path, "/form/fields/0/ui/label");
    }

    #[test]
    fn table_columns_must_be_unique() {
        let value = json!({
            "entity": "student",
            "type": "table",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "table": {
                "columns": [{"key": "name"}, {"key": "name"}],
                "dataSource": {"endpoint": "/students"}
            }
        });
        let validator = SchemaValidator::new().unwrap();
        let err = validator.validate_value(&value, SchemaSource::Registry).unwrap_err();
        assert_eq!(codes(err.issues()), vec![IssueCode::DuplicateColumn]);
    }

    #[test]
    fn string_documents_are_parsed() {
        let text = json!({
            "entity": "student",
            "type": "widget",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "widget": {"component": "StudentCard"}
        })
        .to_string();
        let validator = SchemaValidator::new().unwrap();
        let doc = validator
            .validate_value(&serde_json::Value::String(text), SchemaSource::Registry)
            .unwrap();
        assert_eq!(doc.schema_type, SchemaType::Widget);

        let err = validator
            .validate_value(&json!("{not json"), SchemaSource::Registry)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Corrupted(_)));
    }

    #[test]
    fn shape_errors_stop_before_structure() {
        let value = json!({"entity": "student", "type": "form", "version": "1.0.0"});
        let validator = SchemaValidator::new().unwrap();
        let err = validator.validate_value(&value, SchemaSource::Registry).unwrap_err();
        assert!(!err.issues().is_empty());
        assert!(err.issues().iter().all(|i| i.code == IssueCode::Shape));
    }
}
