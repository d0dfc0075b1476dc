//! Declarative condition rules and the UI-state bundles they trigger.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{ConditionOp, LegacyAction, Logic};
use crate::field::FieldOption;
use crate::value::FieldValue;

/// Keep an explicit `null` operand as `Some(FieldValue::Null)`; only a
/// missing key is "undefined".
fn present<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    FieldValue::deserialize(deserializer).map(Some)
}

/// A predicate over one watched field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub field: String,
    pub op: ConditionOp,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<FieldValue>")]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<LegacyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<ActionBundle>,
    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<ActionBundle>,
}

impl ConditionRule {
    #[must_use]
    pub fn new(field: impl Into<String>, op: ConditionOp, value: Option<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value,
            action: None,
            then: None,
            otherwise: None,
        }
    }

    /// The bundle for the branch selected by `result`.
    #[must_use]
    pub const fn branch(&self, result: bool) -> Option<&ActionBundle> {
        if result { self.then.as_ref() } else { self.otherwise.as_ref() }
    }

    /// Both bundles, whichever are declared.
    pub fn bundles(&self) -> impl Iterator<Item = &ActionBundle> {
        self.then.iter().chain(self.otherwise.iter())
    }
}

/// Several rules over the same watched-value map, folded with AND or OR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiConditionRule {
    pub conditions: Vec<ConditionRule>,
    #[serde(default)]
    pub logic: Logic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<LegacyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<ActionBundle>,
    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<ActionBundle>,
}

impl MultiConditionRule {
    #[must_use]
    pub const fn branch(&self, result: bool) -> Option<&ActionBundle> {
        if result { self.then.as_ref() } else { self.otherwise.as_ref() }
    }

    pub fn bundles(&self) -> impl Iterator<Item = &ActionBundle> {
        self.then.iter().chain(self.otherwise.iter())
    }
}

/// UI-state outcome attached to a condition branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_value: Option<SetValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_options: Option<SetOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_component: Option<SwitchComponent>,
}

/// Force `value` into the field named `field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SetValue {
    pub field: String,
    pub value: FieldValue,
}

/// Replace the host field's options, inline or from an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetOptions {
    Static {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Api {
        endpoint: String,
    },
}

/// Render the host field with a different component type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SwitchComponent {
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_null_is_not_undefined() {
        let with_null: ConditionRule =
            serde_json::from_str(r#"{"field": "a", "op": "==", "value": null}"#).unwrap();
        let without: ConditionRule = serde_json::from_str(r#"{"field": "a", "op": "exists"}"#).unwrap();
        assert_eq!(with_null.value, Some(FieldValue::Null));
        assert_eq!(without.value, None);
    }

    #[test]
    fn else_branch_uses_keyword_name() {
        let rule: ConditionRule = serde_json::from_value(serde_json::json!({
            "field": "kind",
            "op": "eq",
            "value": "company",
            "then": { "require": true },
            "else": { "hide": true }
        }))
        .unwrap();
        assert_eq!(rule.branch(true).and_then(|b| b.require), Some(true));
        assert_eq!(rule.branch(false).and_then(|b| b.hide), Some(true));
    }

    #[test]
    fn set_options_tagged_by_type() {
        let api: SetOptions =
            serde_json::from_str(r#"{"type": "api", "endpoint": "/courses"}"#).unwrap();
        assert_eq!(
            api,
            SetOptions::Api {
                endpoint: "/courses".into()
            }
        );
        let inline: SetOptions = serde_json::from_str(r#"{"type": "static"}"#).unwrap();
        assert_eq!(inline, SetOptions::Static { options: vec![] });
    }

    #[test]
    fn multi_rule_defaults_to_and() {
        let multi: MultiConditionRule = serde_json::from_value(serde_json::json!({
            "conditions": [{ "field": "a", "op": "exists" }]
        }))
        .unwrap();
        assert_eq!(multi.logic, Logic::And);
    }
}
