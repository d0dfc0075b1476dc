//! Option lists for select-like fields, including `setOptions` overrides.
//!
//! `setOptions.type = api` is one of the engine's suspension points: the
//! fetch goes through an injected [`OptionsProvider`] and its result is
//! dropped if the owning [`RenderScope`] was torn down while it was in
//! flight.

use async_trait::async_trait;
use forma_core::condition::{ActionBundle, SetOptions};
use forma_core::field::{FieldOption, FieldSchema};
use forma_core::scope::RenderScope;

use crate::error::RulesError;

/// Fetches option lists from a backing endpoint.
#[async_trait]
pub trait OptionsProvider: Send + Sync {
    async fn fetch_options(&self, endpoint: &str) -> anyhow::Result<Vec<FieldOption>>;
}

/// Options the field should render with under the active condition bundle.
///
/// Returns `Ok(None)` when a fetch finished after `scope` was unmounted; the
/// caller must not apply anything in that case.
///
/// # Errors
///
/// Returns [`RulesError::OptionsFetch`] if the bundle asks for API options
/// and the provider is missing or fails.
pub async fn resolve_options(
    field: &FieldSchema,
    bundle: Option<&ActionBundle>,
    provider: Option<&dyn OptionsProvider>,
    scope: &RenderScope,
) -> Result<Option<Vec<FieldOption>>, RulesError> {
    match bundle.and_then(|b| b.set_options.as_ref()) {
        None => Ok(Some(field.options.clone().unwrap_or_default())),
        Some(SetOptions::Static { options }) => Ok(Some(options.clone())),
        Some(SetOptions::Api { endpoint }) => {
            let provider = provider.ok_or_else(|| RulesError::OptionsFetch {
                endpoint: endpoint.clone(),
                source: anyhow::anyhow!("no options provider is configured"),
            })?;
            let Some(fetched) = scope.guard(provider.fetch_options(endpoint)).await else {
                tracing::debug!(field = %field.name, %endpoint, "render scope unmounted, discarding options");
                return Ok(None);
            };
            fetched.map(Some).map_err(|source| RulesError::OptionsFetch {
                endpoint: endpoint.clone(),
                source,
            })
        }
    }
}
