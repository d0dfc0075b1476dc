pub mod dispatch;
pub mod evaluate;
pub mod load;
pub mod migrate;
pub mod resolve;
pub mod validate;

use anyhow::Context;
use forma_config::FormaConfig;
use semver::Version;

/// The client version from `--client-version`, else from config.
fn client_version(flag: Option<&str>, config: &FormaConfig) -> anyhow::Result<Version> {
    match flag {
        Some(raw) => forma_core::version::parse_version(raw).context("invalid --client-version"),
        None => Ok(config.client.version()?),
    }
}
