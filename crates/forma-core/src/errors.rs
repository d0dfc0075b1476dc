//! Cross-cutting error types for Forma.
//!
//! Domain-specific errors (`SchemaError`, `SchemaLoadError`, `ActionError`,
//! `WidgetError`) live in their respective crates. This module only holds
//! the failures that can originate from the shared data model.

use thiserror::Error;

/// Errors that can be raised while working with core Forma types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A version string is not a valid `major.minor.patch` semantic version.
    #[error("Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    /// An action definition carried parameters that do not fit its type.
    #[error("Invalid parameters for action '{action_type}': {reason}")]
    InvalidActionParams { action_type: String, reason: String },

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
