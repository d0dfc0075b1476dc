//! Type name → loader map.
//!
//! Registration overwrites. Readers take a clone of the loader under a
//! short read lock and await it outside the lock, so a load never observes
//! a half-written entry and never blocks registration.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use forma_core::scope::RenderScope;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::WidgetError;

/// A loaded widget implementation. Consumers downcast it to their own type.
pub type WidgetModule = Arc<dyn Any + Send + Sync>;

pub type WidgetLoader =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<Option<WidgetModule>>> + Send + Sync>;

#[derive(Default)]
pub struct WidgetRegistry {
    loaders: RwLock<HashMap<String, WidgetLoader>>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the loader for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::EmptyType`] for a blank type name.
    pub fn register<F, Fut>(&self, type_name: impl Into<String>, loader: F) -> Result<(), WidgetError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<WidgetModule>>> + Send + 'static,
    {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(WidgetError::EmptyType);
        }
        let loader: WidgetLoader = Arc::new(move || loader().boxed());
        let replaced = self
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.clone(), loader)
            .is_some();
        tracing::debug!(type_name = %type_name, replaced, "widget registered");
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }

    /// Load the widget for `type_name`, or `None` if it is unavailable.
    pub async fn load(&self, type_name: &str) -> Option<WidgetModule> {
        match self.try_load(type_name).await {
            Ok(module) => Some(module),
            Err(e) => {
                tracing::warn!(
                    type_name,
                    registered = ?self.registered_types(),
                    error = %e,
                    "widget unavailable"
                );
                None
            }
        }
    }

    /// [`load`](Self::load), discarding the module if `scope` is unmounted
    /// before the loader resolves.
    pub async fn load_in_scope(&self, type_name: &str, scope: &RenderScope) -> Option<WidgetModule> {
        scope.guard(self.load(type_name)).await.flatten()
    }

    /// Load the widget for `type_name`, reporting why it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::NotRegistered`], [`WidgetError::LoaderFailed`]
    /// or [`WidgetError::Empty`].
    pub async fn try_load(&self, type_name: &str) -> Result<WidgetModule, WidgetError> {
        let loader = self
            .loaders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
            .ok_or_else(|| WidgetError::NotRegistered(type_name.to_string()))?;

        match loader().await {
            Ok(Some(module)) => Ok(module),
            Ok(None) => Err(WidgetError::Empty(type_name.to_string())),
            Err(source) => Err(WidgetError::LoaderFailed {
                type_name: type_name.to_string(),
                source,
            }),
        }
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

/// Downcast a loaded module to the concrete widget type.
#[must_use]
pub fn downcast<T: Any + Send + Sync>(module: WidgetModule) -> Option<Arc<T>> {
    module.downcast::<T>().ok()
}
