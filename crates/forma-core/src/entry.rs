//! Persisted registry rows.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::enums::{EntryStatus, SchemaType};
use crate::errors::CoreError;

/// One versioned, tenant/industry-scoped candidate schema document.
///
/// `schema_json` is kept raw: it is either the document object, a string
/// holding serialized JSON, or `null` when the backing file is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub entity: String,
    #[serde(default)]
    pub industry_type: Option<String>,
    pub version: Version,
    pub min_supported_client: Version,
    #[serde(default)]
    pub schema_json: serde_json::Value,
    pub status: EntryStatus,
    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    /// A fresh `draft` entry.
    #[must_use]
    pub fn draft(
        entity: impl Into<String>,
        industry_type: Option<String>,
        version: Version,
        min_supported_client: Version,
        schema_json: serde_json::Value,
    ) -> Self {
        Self {
            entity: entity.into(),
            industry_type,
            version,
            min_supported_client,
            schema_json,
            status: EntryStatus::Draft,
            activated_at: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }

    /// The `type` the stored document declares, read without decoding the
    /// rest of it. `None` when the document is missing, unparseable, or
    /// declares no known type.
    #[must_use]
    pub fn declared_type(&self) -> Option<SchemaType> {
        fn peek(doc: &serde_json::Value) -> Option<SchemaType> {
            doc.get("type").and_then(|t| SchemaType::deserialize(t).ok())
        }
        match &self.schema_json {
            serde_json::Value::String(text) => serde_json::from_str::<serde_json::Value>(text).ok().as_ref().and_then(peek),
            doc => peek(doc),
        }
    }

    /// Promote a draft to `active`, stamping `activated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the entry is not a draft.
    pub fn activate(&mut self, at: DateTime<Utc>) -> Result<(), CoreError> {
        self.transition(EntryStatus::Active)?;
        self.activated_at = Some(at);
        Ok(())
    }

    /// Retire an active entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the entry is not active.
    pub fn deprecate(&mut self) -> Result<(), CoreError> {
        self.transition(EntryStatus::Deprecated)
    }

    fn transition(&mut self, next: EntryStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "registry entry {}@{} cannot move from {} to {next}",
                self.entity, self.version, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}
