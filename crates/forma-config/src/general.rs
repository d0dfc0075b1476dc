//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Tenant used when a command does not name one.
    #[serde(default)]
    pub default_tenant: String,
}
