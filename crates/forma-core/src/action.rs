//! Declarative, event-triggered actions.
//!
//! On the wire an action is `{ "event": ..., "type": ..., ...params }`. It
//! deserializes into a closed [`ActionKind`] enum with one parameter struct
//! per type. A `type` that is not recognized is kept by name as
//! [`ActionKind::Unknown`] so the engine can warn and skip it instead of
//! rejecting the whole document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::ToastVariant;
use crate::errors::CoreError;
use crate::value::FieldValue;

/// Wire shape of an action definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawActionDefinition {
    #[serde(default)]
    pub event: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A read-only action declared inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActionDefinition", into = "RawActionDefinition")]
pub struct ActionDefinition {
    /// Event that triggers the action. Empty for steps nested inside a
    /// `sequence` or `confirm`.
    pub event: String,
    pub kind: ActionKind,
}

impl ActionDefinition {
    #[must_use]
    pub fn new(event: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            event: event.into(),
            kind,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    ApiCall(ApiCallParams),
    Navigate(NavigateParams),
    OpenDrawer(PanelParams),
    OpenModal(PanelParams),
    SetValue(SetValueParams),
    Reset(ResetParams),
    ReloadSchema(ReloadSchemaParams),
    Toast(ToastParams),
    Confirm(ConfirmParams),
    Sequence(SequenceParams),
    Unknown { type_name: String },
}

impl ActionKind {
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::ApiCall(_) => "api.call",
            Self::Navigate(_) => "navigate",
            Self::OpenDrawer(_) => "openDrawer",
            Self::OpenModal(_) => "openModal",
            Self::SetValue(_) => "setValue",
            Self::Reset(_) => "reset",
            Self::ReloadSchema(_) => "reloadSchema",
            Self::Toast(_) => "toast",
            Self::Confirm(_) => "confirm",
            Self::Sequence(_) => "sequence",
            Self::Unknown { type_name } => type_name,
        }
    }

    fn params(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::ApiCall(p) => serde_json::to_value(p),
            Self::Navigate(p) => serde_json::to_value(p),
            Self::OpenDrawer(p) | Self::OpenModal(p) => serde_json::to_value(p),
            Self::SetValue(p) => serde_json::to_value(p),
            Self::Reset(p) => serde_json::to_value(p),
            Self::ReloadSchema(p) => serde_json::to_value(p),
            Self::Toast(p) => serde_json::to_value(p),
            Self::Confirm(p) => serde_json::to_value(p),
            Self::Sequence(p) => serde_json::to_value(p),
            Self::Unknown { .. } => Ok(Value::Object(Map::new())),
        }
    }
}

fn default_method() -> String {
    "POST".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCallParams {
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigateParams {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Parameters shared by `openDrawer` and `openModal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelParams {
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetValueParams {
    pub field: String,
    pub value: FieldValue,
}

/// An empty `fields` list resets the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadSchemaParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
    #[serde(default)]
    pub variant: ToastVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_confirm: Vec<ActionDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_cancel: Vec<ActionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceParams {
    pub actions: Vec<ActionDefinition>,
}

impl TryFrom<RawActionDefinition> for ActionDefinition {
    type Error = CoreError;

    fn try_from(raw: RawActionDefinition) -> Result<Self, Self::Error> {
        fn parse<T: serde::de::DeserializeOwned>(
            action_type: &str,
            params: Map<String, Value>,
        ) -> Result<T, CoreError> {
            serde_json::from_value(Value::Object(params)).map_err(|e| CoreError::InvalidActionParams {
                action_type: action_type.to_string(),
                reason: e.to_string(),
            })
        }

        let t = raw.action_type.as_str();
        let kind = match t {
            "api.call" => ActionKind::ApiCall(parse(t, raw.params)?),
            "navigate" => ActionKind::Navigate(parse(t, raw.params)?),
            "openDrawer" => ActionKind::OpenDrawer(parse(t, raw.params)?),
            "openModal" => ActionKind::OpenModal(parse(t, raw.params)?),
            "setValue" => ActionKind::SetValue(parse(t, raw.params)?),
            "reset" => ActionKind::Reset(parse(t, raw.params)?),
            "reloadSchema" => ActionKind::ReloadSchema(parse(t, raw.params)?),
            "toast" => ActionKind::Toast(parse(t, raw.params)?),
            "confirm" => ActionKind::Confirm(parse(t, raw.params)?),
            "sequence" => ActionKind::Sequence(parse(t, raw.params)?),
            other => ActionKind::Unknown {
                type_name: other.to_string(),
            },
        };

        Ok(Self {
            event: raw.event,
            kind,
        })
    }
}

impl From<ActionDefinition> for RawActionDefinition {
    fn from(action: ActionDefinition) -> Self {
        let params = match action.kind.params() {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self {
            event: action.event,
            action_type: action.kind.type_name().to_string(),
            params,
        }
    }
}
