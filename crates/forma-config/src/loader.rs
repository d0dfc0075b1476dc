//! Schema loader configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoaderConfig {
    /// Cache loaded documents per tenant, entity, type, locale and client.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Fetch stored tenant translations when binding.
    #[serde(default = "default_true")]
    pub load_translations: bool,

    /// Directory of local fallback documents named `<entity>.<type>.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            load_translations: true,
            fallback_dir: None,
        }
    }
}

impl LoaderConfig {
    /// Path of the fallback document for `entity` and `schema_type`, if a
    /// fallback directory is configured.
    #[must_use]
    pub fn fallback_path(&self, entity: &str, schema_type: &str) -> Option<PathBuf> {
        self.fallback_dir
            .as_deref()
            .map(|dir: &Path| dir.join(format!("{entity}.{schema_type}.json")))
    }
}
