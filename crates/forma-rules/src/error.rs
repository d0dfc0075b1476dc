//! Rule evaluation error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    /// A field's `pattern` is not a valid regular expression.
    #[error("invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The injected options provider failed.
    #[error("options request to '{endpoint}' failed: {source}")]
    OptionsFetch {
        endpoint: String,
        #[source]
        source: anyhow::Error,
    },
}
