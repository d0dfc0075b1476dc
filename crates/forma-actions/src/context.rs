//! Capabilities injected into the action engine.
//!
//! Each action type maps to exactly one capability. Synchronous UI effects
//! (navigation, panels, form writes, toasts) are plain traits; the ones that
//! await a network or a user answer are async.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use forma_core::action::ApiCallParams;
use forma_core::enums::ToastVariant;
use forma_core::value::FieldValue;
use serde_json::Value;

#[async_trait]
pub trait ApiCaller: Send + Sync {
    async fn call(&self, request: &ApiCallParams) -> anyhow::Result<Value>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str, params: Option<&Value>) -> anyhow::Result<()>;
}

/// Opens a drawer or a modal hosting `component`.
pub trait PanelHost: Send + Sync {
    fn open(&self, component: &str, props: Option<&Value>) -> anyhow::Result<()>;
}

pub trait FormValueSetter: Send + Sync {
    fn set_value(&self, field: &str, value: &FieldValue) -> anyhow::Result<()>;
}

pub trait FormResetter: Send + Sync {
    /// An empty `fields` slice resets the whole form.
    fn reset(&self, fields: &[String]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SchemaReloader: Send + Sync {
    async fn reload(&self, entity: Option<&str>) -> anyhow::Result<()>;
}

pub trait ToastPresenter: Send + Sync {
    fn show_toast(&self, message: &str, variant: ToastVariant) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Resolves to `true` when the user confirms.
    async fn confirm(&self, title: Option<&str>, message: &str) -> anyhow::Result<bool>;
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ApiCall,
    Navigate,
    OpenDrawer,
    OpenModal,
    SetFormValue,
    ResetForm,
    ReloadSchema,
    ShowToast,
    ShowConfirm,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiCall => "apiCall",
            Self::Navigate => "navigate",
            Self::OpenDrawer => "openDrawer",
            Self::OpenModal => "openModal",
            Self::SetFormValue => "setFormValue",
            Self::ResetForm => "resetForm",
            Self::ReloadSchema => "reloadSchema",
            Self::ShowToast => "showToast",
            Self::ShowConfirm => "showConfirm",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExecutionContext
// ---------------------------------------------------------------------------

/// The optional capabilities an engine dispatches to, plus the translation
/// map used for `messageKey`/`titleKey` params.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    pub api_call: Option<Arc<dyn ApiCaller>>,
    pub navigate: Option<Arc<dyn Navigator>>,
    pub open_drawer: Option<Arc<dyn PanelHost>>,
    pub open_modal: Option<Arc<dyn PanelHost>>,
    pub set_form_value: Option<Arc<dyn FormValueSetter>>,
    pub reset_form: Option<Arc<dyn FormResetter>>,
    pub reload_schema: Option<Arc<dyn SchemaReloader>>,
    pub show_toast: Option<Arc<dyn ToastPresenter>>,
    pub show_confirm: Option<Arc<dyn ConfirmPrompt>>,
    pub translations: HashMap<String, String>,
}

impl ExecutionContext {
    /// Capabilities that are provided.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        [
            (Capability::ApiCall, self.api_call.is_some()),
            (Capability::Navigate, self.navigate.is_some()),
            (Capability::OpenDrawer, self.open_drawer.is_some()),
            (Capability::OpenModal, self.open_modal.is_some()),
            (Capability::SetFormValue, self.set_form_value.is_some()),
            (Capability::ResetForm, self.reset_form.is_some()),
            (Capability::ReloadSchema, self.reload_schema.is_some()),
            (Capability::ShowToast, self.show_toast.is_some()),
            (Capability::ShowConfirm, self.show_confirm.is_some()),
        ]
        .into_iter()
        .filter_map(|(capability, present)| present.then_some(capability))
        .collect()
    }

    /// Translate `key` if given, falling back to the key itself, else use
    /// the literal.
    #[must_use]
    pub fn text(&self, literal: Option<&str>, key: Option<&str>) -> String {
        match key {
            Some(key) => self.translations.get(key).cloned().unwrap_or_else(|| key.to_string()),
            None => literal.unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("capabilities", &self.capabilities())
            .field("translations", &self.translations.len())
            .finish()
    }
}
