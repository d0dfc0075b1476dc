//! File-backed inputs and collaborators.
//!
//! Documents may be JSON or TOML (by extension); every other input is JSON.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use forma_core::document::SchemaDocument;
use forma_core::entry::RegistryEntry;
use forma_core::value::ValueMap;
use forma_registry::RegistrySource;
use forma_schema::TranslationMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Read a document file into a JSON value.
pub fn read_document_value(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    if is_toml {
        let parsed: toml::Value =
            toml::from_str(&text).with_context(|| format!("{} is not valid TOML", path.display()))?;
        serde_json::to_value(parsed).context("failed to convert TOML document to JSON")
    } else {
        serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a valid {what}", path.display()))
}

pub fn read_entries(path: &Path) -> anyhow::Result<Vec<RegistryEntry>> {
    read_json(path, "registry entry list")
}

pub fn read_translations(path: &Path) -> anyhow::Result<TranslationMap> {
    read_json(path, "translation map")
}

pub fn read_values(path: &Path) -> anyhow::Result<ValueMap> {
    read_json(path, "value map")
}

/// Read a local fallback document if `path` exists.
pub fn read_fallback(path: &Path) -> anyhow::Result<Option<SchemaDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    let value = read_document_value(path)?;
    let doc = serde_json::from_value(value)
        .with_context(|| format!("{} is not a valid schema document", path.display()))?;
    Ok(Some(doc))
}

/// Registry rows held in memory. Only active rows of the requested entity
/// are returned; tenant pinning is assumed to be done by whoever wrote the
/// file.
pub struct FileRegistry {
    entries: Vec<RegistryEntry>,
}

impl FileRegistry {
    pub const fn new(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl RegistrySource for FileRegistry {
    async fn get_active_schemas(&self, entity: &str, _tenant_id: &str) -> anyhow::Result<Vec<RegistryEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.entity == entity && e.is_active())
            .cloned()
            .collect())
    }
}
