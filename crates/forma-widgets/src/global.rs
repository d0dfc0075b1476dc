//! The process-wide registry.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::WidgetError;
use crate::registry::WidgetRegistry;

static GLOBAL: RwLock<Option<Arc<WidgetRegistry>>> = RwLock::new(None);

/// Install the process-wide registry, or return the one already installed.
pub fn init() -> Arc<WidgetRegistry> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(|| {
        tracing::debug!("widget registry initialized");
        Arc::new(WidgetRegistry::new())
    })
    .clone()
}

/// The installed registry.
///
/// # Errors
///
/// Returns [`WidgetError::NotInitialized`] before [`init`] or after
/// [`teardown`].
pub fn global() -> Result<Arc<WidgetRegistry>, WidgetError> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(WidgetError::NotInitialized)
}

/// Remove the process-wide registry. Handles already obtained stay usable.
pub fn teardown() {
    if GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take().is_some() {
        tracing::debug!("widget registry torn down");
    }
}
