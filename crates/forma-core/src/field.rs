//! Field declarations inside form and filter payloads.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::{ConditionRule, MultiConditionRule};
use crate::enums::FieldKind;
use crate::value::FieldValue;

/// Display strings of a field. Each slot may hold a literal, an i18n key,
/// or both; the key wins once translations are bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UiDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_key: Option<String>,
}

impl UiDescriptor {
    /// Literal (non-key) strings with the slot they occupy.
    pub fn literals(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("label", self.label.as_deref()),
            ("placeholder", self.placeholder.as_deref()),
            ("description", self.description.as_deref()),
            ("tooltip", self.tooltip.as_deref()),
        ]
        .into_iter()
        .filter_map(|(slot, value)| value.map(|v| (slot, v)))
    }
}

/// One choice of a select/multiselect/radio field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
}

impl FieldOption {
    #[must_use]
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
            label_key: None,
        }
    }
}

/// Signature of an executable validator: `Err(message)` rejects the value.
pub type ValidatorFn = dyn Fn(Option<&FieldValue>) -> Result<(), String> + Send + Sync;

/// An executable validation function. Never serialized; only legal on
/// documents whose source is `LocalFallback`.
#[derive(Clone)]
pub struct CustomValidator(Arc<ValidatorFn>);

impl CustomValidator {
    pub fn new(f: impl Fn(Option<&FieldValue>) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the validator against a value.
    ///
    /// # Errors
    ///
    /// Returns the validator's rejection message.
    pub fn call(&self, value: Option<&FieldValue>) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(<fn>)")
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Static constraints of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message_key: Option<String>,
    #[serde(skip)]
    pub validate: Option<CustomValidator>,
}

impl FieldValidation {
    /// A localized required message implies the required flag.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required || self.required_message.is_some() || self.required_message_key.is_some()
    }
}

/// One input unit inside a form or filter payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub ui: UiDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<MultiConditionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_component_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
}

impl FieldSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ui: UiDescriptor::default(),
            options: None,
            validation: None,
            condition: None,
            conditions: None,
            custom_component_type: None,
            default_value: None,
        }
    }

    /// Required-ness declared by the static `validation` block.
    #[must_use]
    pub fn is_statically_required(&self) -> bool {
        self.validation.as_ref().is_some_and(FieldValidation::is_required)
    }

    /// Every condition rule attached to this field, single or multi.
    pub fn condition_rules(&self) -> impl Iterator<Item = &ConditionRule> {
        self.condition
            .iter()
            .chain(self.conditions.iter().flat_map(|multi| multi.conditions.iter()))
    }
}
