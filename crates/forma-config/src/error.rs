//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read, or the merged layers do not fit
    /// [`FormaConfig`](crate::FormaConfig).
    #[error("forma configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A value parsed but is not usable (e.g. a non-semver client version).
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
