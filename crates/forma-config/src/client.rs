//! Identity of the rendering client.

use forma_core::version::parse_version;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Semantic version of the rendering client, compared against each
    /// document's `minSupportedClient`.
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_locale: default_locale(),
        }
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `version` is not semver.
    pub fn version(&self) -> Result<Version, ConfigError> {
        parse_version(&self.version).map_err(|e| ConfigError::InvalidValue {
            field: "client.version".into(),
            reason: e.to_string(),
        })
    }
}
