//! Semantic-version helpers.
//!
//! Document and client versions are `semver::Version`s. Ordering between
//! registry entries uses full `major.minor.patch` precedence; client
//! compatibility only looks at `major.minor`.

use semver::Version;

use crate::errors::CoreError;

/// Parse a `major.minor.patch` string.
///
/// # Errors
///
/// Returns [`CoreError::InvalidVersion`] if the string is not valid semver.
pub fn parse_version(value: &str) -> Result<Version, CoreError> {
    Version::parse(value.trim()).map_err(|e| CoreError::InvalidVersion {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Whether a client at `client` may render a document whose lowest supported
/// client is `min_supported`. Patch levels are ignored.
#[must_use]
pub fn is_client_compatible(client: &Version, min_supported: &Version) -> bool {
    (client.major, client.minor) >= (min_supported.major, min_supported.minor)
}
