//! The versioned, renderable schema document and its type-specific payloads.
//!
//! A document carries exactly one payload and it must match its `type`:
//! a `form` document has a `form` payload and nothing else. The structural
//! validator enforces this; deserialization alone does not.

use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::action::{ActionDefinition, RawActionDefinition};
use crate::enums::SchemaType;
use crate::field::FieldSchema;

/// A versioned, declarative description of one renderable surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub entity: String,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[schemars(with = "String")]
    pub version: Version,
    #[schemars(with = "String")]
    pub min_supported_client: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetPayload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(with = "Vec<RawActionDefinition>")]
    pub actions: Vec<ActionDefinition>,
}

impl SchemaDocument {
    /// An empty form document, mostly useful as a builder seed.
    #[must_use]
    pub fn form(entity: impl Into<String>, version: Version, fields: Vec<FieldSchema>) -> Self {
        Self {
            entity: entity.into(),
            schema_type: SchemaType::Form,
            min_supported_client: Version::new(version.major, 0, 0),
            version,
            form: Some(FormPayload {
                fields,
                submit: None,
                layout: None,
            }),
            filter: None,
            table: None,
            detail: None,
            widget: None,
            actions: Vec::new(),
        }
    }

    /// Payload keys actually present, in declaration order.
    #[must_use]
    pub fn payload_types(&self) -> Vec<SchemaType> {
        let mut present = Vec::new();
        if self.form.is_some() {
            present.push(SchemaType::Form);
        }
        if self.filter.is_some() {
            present.push(SchemaType::Filter);
        }
        if self.table.is_some() {
            present.push(SchemaType::Table);
        }
        if self.detail.is_some() {
            present.push(SchemaType::Detail);
        }
        if self.widget.is_some() {
            present.push(SchemaType::Widget);
        }
        present
    }

    /// Fields of the form or filter payload; empty for other types.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        match (&self.form, &self.filter) {
            (Some(form), _) => &form.fields,
            (None, Some(filter)) => &filter.fields,
            (None, None) => &[],
        }
    }

    /// Mutable access to every field list the document carries.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldSchema> {
        self.form
            .iter_mut()
            .flat_map(|form| form.fields.iter_mut())
            .chain(self.filter.iter_mut().flat_map(|filter| filter.fields.iter_mut()))
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Retain only the fields for which `keep` returns true.
    pub fn retain_fields(&mut self, mut keep: impl FnMut(&FieldSchema) -> bool) {
        if let Some(form) = self.form.as_mut() {
            form.fields.retain(&mut keep);
        }
        if let Some(filter) = self.filter.as_mut() {
            filter.fields.retain(&mut keep);
        }
    }

    /// Actions declared for `event`, in declaration order.
    pub fn actions_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a ActionDefinition> {
        self.actions.iter().filter(move |a| a.event == event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormPayload {
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<SubmitButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<FormLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitButton {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormLayout {
    pub columns: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterPayload {
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    pub columns: Vec<ColumnSchema>,
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailPayload {
    pub sections: Vec<DetailSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_key: Option<String>,
    pub fields: Vec<DetailField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WidgetPayload {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::FieldKind;

    fn student_form() -> SchemaDocument {
        SchemaDocument::form(
            "student",
            Version::new(1, 2, 0),
            vec![
                FieldSchema::new("name", FieldKind::Text),
                FieldSchema::new("email", FieldKind::Email),
            ],
        )
    }

    #[test]
    fn form_builder_sets_payload() {
        let doc = student_form();
        assert_eq!(doc.payload_types(), vec![SchemaType::Form]);
        assert_eq!(doc.fields().len(), 2);
        assert_eq!(doc.min_supported_client, Version::new(1, 0, 0));
    }

    #[test]
    fn versions_serialize_as_strings() {
        let json = serde_json::to_value(student_form()).unwrap();
        assert_eq!(json["version"], "1.2.0");
        assert_eq!(json["minSupportedClient"], "1.0.0");
        assert_eq!(json["type"], "form");
    }

    #[test]
    fn retain_fields_drops_matching() {
        let mut doc = student_form();
        doc.retain_fields(|f| f.name != "email");
        assert!(doc.field("email").is_none());
        assert!(doc.field("name").is_some());
    }

    #[test]
    fn table_document_has_no_fields() {
        let doc: SchemaDocument = serde_json::from_value(serde_json::json!({
            "entity": "student",
            "type": "table",
            "version": "1.0.0",
            "minSupportedClient": "1.0.0",
            "table": {
                "columns": [{ "key": "name", "labelKey": "student.name", "sortable": true }],
                "dataSource": { "endpoint": "/students" }
            }
        }))
        .unwrap();
        assert!(doc.fields().is_empty());
        assert_eq!(doc.payload_types(), vec![SchemaType::Table]);
    }
}
