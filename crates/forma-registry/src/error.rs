//! Schema loading error types.

use std::fmt;

use forma_core::enums::SchemaType;
use forma_schema::SchemaError;
use semver::Version;
use serde::Serialize;
use thiserror::Error;

/// The five failure codes surfaced to the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaLoadErrorCode {
    SchemaNotFound,
    SchemaFileMissing,
    SchemaCorrupted,
    SchemaValidationFailed,
    ClientUpdateRequired,
}

impl SchemaLoadErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchemaNotFound => "SchemaNotFound",
            Self::SchemaFileMissing => "SchemaFileMissing",
            Self::SchemaCorrupted => "SchemaCorrupted",
            Self::SchemaValidationFailed => "SchemaValidationFailed",
            Self::ClientUpdateRequired => "ClientUpdateRequired",
        }
    }
}

impl fmt::Display for SchemaLoadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("No {schema_type} schema found for entity '{entity}'")]
    NotFound { entity: String, schema_type: SchemaType },

    /// The registry could not be queried. Reported as `SchemaNotFound`.
    #[error("Failed to fetch registry entries for '{entity}': {source}")]
    Registry {
        entity: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Schema file for {entity}@{version} is missing")]
    FileMissing { entity: String, version: Version },

    #[error("Schema for {entity}@{version} is corrupted: {reason}")]
    Corrupted {
        entity: String,
        version: Version,
        reason: String,
    },

    #[error("Schema for '{entity}' failed validation: {source}")]
    ValidationFailed {
        entity: String,
        #[source]
        source: SchemaError,
    },

    #[error("Client {client} is too old for '{entity}' (requires {required} or newer)")]
    ClientUpdateRequired {
        entity: String,
        client: Version,
        required: Version,
    },
}

impl SchemaLoadError {
    #[must_use]
    pub const fn code(&self) -> SchemaLoadErrorCode {
        match self {
            Self::NotFound { .. } | Self::Registry { .. } => SchemaLoadErrorCode::SchemaNotFound,
            Self::FileMissing { .. } => SchemaLoadErrorCode::SchemaFileMissing,
            Self::Corrupted { .. } => SchemaLoadErrorCode::SchemaCorrupted,
            Self::ValidationFailed { .. } => SchemaLoadErrorCode::SchemaValidationFailed,
            Self::ClientUpdateRequired { .. } => SchemaLoadErrorCode::ClientUpdateRequired,
        }
    }
}
