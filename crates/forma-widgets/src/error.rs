//! Widget registry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Widget type must not be empty")]
    EmptyType,

    #[error("No widget registered for type '{0}'")]
    NotRegistered(String),

    #[error("Widget loader for '{type_name}' failed: {source}")]
    LoaderFailed {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Widget loader for '{0}' resolved to nothing")]
    Empty(String),

    #[error("Widget registry has not been initialized")]
    NotInitialized,
}
