//! Registry resolution.
//!
//! Priority, highest first:
//! 1. active entries for the entity whose industry equals the caller's
//! 2. active common entries (no industry) for the entity
//! 3. the caller's fallback document, if it is for the same entity
//!
//! When a schema type is requested, entries whose stored document declares
//! another type are not candidates; entries whose type cannot be read stay
//! in so a missing or corrupt document still surfaces. Within a tier the
//! highest version wins; equal versions go to the most recently activated
//! entry. A winning entry that needs a newer client
//! fails the resolution instead of falling through to the next tier.

use forma_core::document::SchemaDocument;
use forma_core::entry::RegistryEntry;
use forma_core::enums::SchemaType;
use forma_core::version::is_client_compatible;
use semver::Version;

use crate::error::SchemaLoadError;

#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions<'a> {
    pub industry_type: Option<&'a str>,
    /// Only consider documents of this type; `None` accepts any.
    pub schema_type: Option<SchemaType>,
    pub client_version: &'a Version,
    pub fallback: Option<&'a SchemaDocument>,
}

/// What the resolver picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Entry(&'a RegistryEntry),
    Fallback(&'a SchemaDocument),
}

/// Pick the entry or fallback that applies to `entity`.
///
/// # Errors
///
/// Returns [`SchemaLoadError::ClientUpdateRequired`] if the winning entry
/// requires a newer client than `opts.client_version`.
pub fn resolve<'a>(
    entity: &str,
    entries: &'a [RegistryEntry],
    opts: ResolveOptions<'a>,
) -> Result<Option<Resolved<'a>>, SchemaLoadError> {
    if let Some(industry) = opts.industry_type {
        if let Some(entry) = newest(entries, entity, Some(industry), opts.schema_type) {
            tracing::debug!(entity, industry, version = %entry.version, "resolved industry entry");
            gate(entry, opts.client_version)?;
            return Ok(Some(Resolved::Entry(entry)));
        }
    }

    if let Some(entry) = newest(entries, entity, None, opts.schema_type) {
        tracing::debug!(entity, version = %entry.version, "resolved common entry");
        gate(entry, opts.client_version)?;
        return Ok(Some(Resolved::Entry(entry)));
    }

    match opts.fallback {
        Some(doc) if doc.entity == entity && opts.schema_type.is_none_or(|t| t == doc.schema_type) => {
            tracing::debug!(entity, version = %doc.version, "resolved local fallback");
            Ok(Some(Resolved::Fallback(doc)))
        }
        _ => {
            tracing::debug!(entity, "no schema resolved");
            Ok(None)
        }
    }
}

fn newest<'a>(
    entries: &'a [RegistryEntry],
    entity: &str,
    industry: Option<&str>,
    schema_type: Option<SchemaType>,
) -> Option<&'a RegistryEntry> {
    entries
        .iter()
        .filter(|e| e.is_active() && e.entity == entity && e.industry_type.as_deref() == industry)
        .filter(|e| match (schema_type, e.declared_type()) {
            (Some(wanted), Some(declared)) => wanted == declared,
            _ => true,
        })
        .max_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.activated_at.cmp(&b.activated_at))
        })
}

fn gate(entry: &RegistryEntry, client: &Version) -> Result<(), SchemaLoadError> {
    if is_client_compatible(client, &entry.min_supported_client) {
        Ok(())
    } else {
        Err(SchemaLoadError::ClientUpdateRequired {
            entity: entry.entity.clone(),
            client: client.clone(),
            required: entry.min_supported_client.clone(),
        })
    }
}
