//! Version-to-version migration of schema documents.
//!
//! A [`MigrationRule`] moves a document from `fromVersion` to `toVersion`.
//! Rules apply in ascending order of their version window and only while
//! they stay inside `[document version, target]`; the document version is
//! stamped after each applied rule. Migrating a document that is already at
//! the target is a no-op, so running a migration twice yields the same
//! document.
//!
//! The declarative parts of a rule (renames, defaults, removals) come from
//! JSON. Field transforms are closures registered in code.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use forma_core::condition::ConditionRule;
use forma_core::document::SchemaDocument;
use forma_core::field::FieldSchema;
use forma_core::value::FieldValue;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

type TransformFn = dyn Fn(FieldSchema) -> FieldSchema + Send + Sync;

/// Rewrite one field by name.
#[derive(Clone)]
pub struct FieldTransformRule {
    pub name: String,
    transform: Arc<TransformFn>,
}

impl FieldTransformRule {
    pub fn new(
        name: impl Into<String>,
        transform: impl Fn(FieldSchema) -> FieldSchema + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            transform: Arc::new(transform),
        }
    }

    fn apply(&self, field: FieldSchema) -> FieldSchema {
        (self.transform)(field)
    }
}

impl fmt::Debug for FieldTransformRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTransformRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One version step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRule {
    pub from_version: Version,
    pub to_version: Version,
    /// Old field name to new field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rename_fields: BTreeMap<String, String>,
    /// Default values, applied only to fields that have none.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub add_defaults: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_fields: Vec<String>,
    #[serde(skip)]
    pub transform_fields: Vec<FieldTransformRule>,
}

impl MigrationRule {
    #[must_use]
    pub fn new(from_version: Version, to_version: Version) -> Self {
        Self {
            from_version,
            to_version,
            rename_fields: BTreeMap::new(),
            add_defaults: BTreeMap::new(),
            remove_fields: Vec::new(),
            transform_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename_fields.insert(from.into(), to.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_defaults.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn remove(mut self, field: impl Into<String>) -> Self {
        self.remove_fields.push(field.into());
        self
    }

    #[must_use]
    pub fn transform(mut self, rule: FieldTransformRule) -> Self {
        self.transform_fields.push(rule);
        self
    }

    fn apply(&self, doc: &mut SchemaDocument) {
        if !self.rename_fields.is_empty() {
            for field in doc.fields_mut() {
                if let Some(new_name) = self.rename_fields.get(&field.name) {
                    field.name.clone_from(new_name);
                }
                rename_references(field, &self.rename_fields);
            }
        }

        for field in doc.fields_mut() {
            if field.default_value.is_none() {
                if let Some(value) = self.add_defaults.get(&field.name) {
                    field.default_value = Some(value.clone());
                }
            }
        }

        if !self.remove_fields.is_empty() {
            doc.retain_fields(|f| !self.remove_fields.contains(&f.name));
        }

        for rule in &self.transform_fields {
            for field in doc.fields_mut() {
                if field.name == rule.name {
                    let kind = field.kind;
                    let current = std::mem::replace(field, FieldSchema::new(String::new(), kind));
                    *field = rule.apply(current);
                }
            }
        }

        doc.version = self.to_version.clone();
    }
}

fn rename_references(field: &mut FieldSchema, renames: &BTreeMap<String, String>) {
    let rename = |name: &mut String| {
        if let Some(new_name) = renames.get(name.as_str()) {
            name.clone_from(new_name);
        }
    };
    let rewrite_rule = |rule: &mut ConditionRule| {
        rename(&mut rule.field);
        for bundle in rule.then.iter_mut().chain(rule.otherwise.iter_mut()) {
            if let Some(set_value) = bundle.set_value.as_mut() {
                rename(&mut set_value.field);
            }
        }
    };

    if let Some(rule) = field.condition.as_mut() {
        rewrite_rule(rule);
    }
    if let Some(multi) = field.conditions.as_mut() {
        multi.conditions.iter_mut().for_each(rewrite_rule);
        for bundle in multi.then.iter_mut().chain(multi.otherwise.iter_mut()) {
            if let Some(set_value) = bundle.set_value.as_mut() {
                rename(&mut set_value.field);
            }
        }
    }
}

/// Ordered collection of migration rules.
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    rules: Vec<MigrationRule>,
}

impl MigrationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the declarative rules from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Migration`] if the JSON is malformed or a rule
    /// does not move forward.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let rules: Vec<MigrationRule> =
            serde_json::from_str(json).map_err(|e| SchemaError::Migration(format!("invalid rules: {e}")))?;
        let mut set = Self::new();
        for rule in rules {
            set.register(rule)?;
        }
        Ok(set)
    }

    /// Add a rule, keeping the set ordered by version window.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Migration`] if `fromVersion >= toVersion`.
    pub fn register(&mut self, rule: MigrationRule) -> Result<(), SchemaError> {
        if rule.from_version >= rule.to_version {
            return Err(SchemaError::Migration(format!(
                "rule {} -> {} does not move forward",
                rule.from_version, rule.to_version
            )));
        }
        let at = self.rules.partition_point(|r| {
            (&r.from_version, &r.to_version) <= (&rule.from_version, &rule.to_version)
        });
        self.rules.insert(at, rule);
        Ok(())
    }

    /// The rule for an exact window, to attach transforms after loading from JSON.
    pub fn rule_mut(&mut self, from: &Version, to: &Version) -> Option<&mut MigrationRule> {
        self.rules
            .iter_mut()
            .find(|r| &r.from_version == from && &r.to_version == to)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Migrate `doc` up to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Migration`] if `target` is older than the
    /// document.
    pub fn migrate(&self, doc: &SchemaDocument, target: &Version) -> Result<SchemaDocument, SchemaError> {
        if &doc.version > target {
            return Err(SchemaError::Migration(format!(
                "cannot migrate {} down from {} to {target}",
                doc.entity, doc.version
            )));
        }

        let mut migrated = doc.clone();
        for rule in &self.rules {
            let in_window = rule.from_version >= migrated.version && &rule.to_version <= target;
            if !in_window {
                continue;
            }
            tracing::debug!(
                entity = %migrated.entity,
                from = %rule.from_version,
                to = %rule.to_version,
                "applying migration rule"
            );
            rule.apply(&mut migrated);
        }
        migrated.version = target.clone();
        Ok(migrated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_core::condition::{ActionBundle, SetValue};
    use forma_core::enums::{ConditionOp, FieldKind};
    use pretty_assertions::assert_eq;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn student_v1() -> SchemaDocument {
        let mut city = FieldSchema::new("city", FieldKind::Text);
        let mut rule = ConditionRule::new("addr", ConditionOp::Exists, None);
        rule.then = Some(ActionBundle {
            set_value: Some(SetValue {
                field: "addr".into(),
                value: FieldValue::Null,
            }),
            ..ActionBundle::default()
        });
        city.condition = Some(rule);
        SchemaDocument::form(
            "student",
            v("1.0.0"),
            vec![
                FieldSchema::new("addr", FieldKind::Text),
                FieldSchema::new("legacy_id", FieldKind::Number),
                FieldSchema::new("country", FieldKind::Text),
                city,
            ],
        )
    }

    fn rules() -> MigrationSet {
        let mut set = MigrationSet::new();
        set.register(
            MigrationRule::new(v("1.1.0"), v("2.0.0"))
                .remove("legacy_id")
                .transform(FieldTransformRule::new("address", |mut f| {
                    f.ui.label = Some("Address".into());
                    f
                })),
        )
        .unwrap();
        set.register(
            MigrationRule::new(v("1.0.0"), v("1.1.0"))
                .rename("addr", "address")
                .default_value("country", "PT"),
        )
        .unwrap();
        set
    }

    #[test]
    fn rules_apply_in_version_order() {
        let migrated = rules().migrate(&student_v1(), &v("2.0.0")).unwrap();

        let names: Vec<&str> = migrated.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["address", "country", "city"]);
        assert_eq!(migrated.version, v("2.0.0"));
        assert_eq!(migrated.field("address").unwrap().ui.label.as_deref(), Some("Address"));
        assert_eq!(
            migrated.field("country").unwrap().default_value,
            Some(FieldValue::String("PT".into()))
        );
    }

    #[test]
    fn renames_follow_references() {
        let migrated = rules().migrate(&student_v1(), &v("1.1.0")).unwrap();
        let rule = migrated.field("city").unwrap().condition.as_ref().unwrap();
        assert_eq!(rule.field, "address");
        assert_eq!(rule.then.as_ref().unwrap().set_value.as_ref().unwrap().field, "address");
        assert!(migrated.field("legacy_id").is_some());
    }

    #[test]
    fn migration_is_idempotent() {
        let set = rules();
        let once = set.migrate(&student_v1(), &v("2.0.0")).unwrap();
        let twice = set.migrate(&once, &v("2.0.0")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn existing_defaults_are_kept() {
        let mut doc = student_v1();
        doc.fields_mut()
            .find(|f| f.name == "country")
            .unwrap()
            .default_value = Some("ES".into());
        let migrated = rules().migrate(&doc, &v("1.1.0")).unwrap();
        assert_eq!(
            migrated.field("country").unwrap().default_value,
            Some(FieldValue::String("ES".into()))
        );
    }

    #[test]
    fn downgrade_is_rejected() {
        let err = rules().migrate(&student_v1(), &v("0.9.0")).unwrap_err();
        assert!(matches!(err, SchemaError::Migration(_)));
    }

    #[test]
    fn backwards_rule_is_rejected() {
        let mut set = MigrationSet::new();
        assert!(set.register(MigrationRule::new(v("2.0.0"), v("1.0.0"))).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn declarative_rules_load_from_json() {
        let json = r#"[
            {"fromVersion": "1.1.0", "toVersion": "2.0.0", "removeFields": ["legacy_id"]},
            {"fromVersion": "1.0.0", "toVersion": "1.1.0", "renameFields": {"addr": "address"}}
        ]"#;
        let set = MigrationSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);

        let migrated = set.migrate(&student_v1(), &v("2.0.0")).unwrap();
        assert!(migrated.field("address").is_some());
        assert!(migrated.field("legacy_id").is_none());
    }
}
