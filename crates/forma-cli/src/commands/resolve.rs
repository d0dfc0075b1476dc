use forma_config::FormaConfig;
use forma_registry::{ResolveOptions, Resolved, resolve};
use semver::Version;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResolveArgs;
use crate::files;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    pub entity: String,
    pub client_version: Version,
    /// `None` when no active entry applies.
    pub resolved: Option<ResolvedEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_type: Option<String>,
    pub version: Version,
    pub min_supported_client: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,
}

/// Handle `forma resolve`.
pub fn handle(args: &ResolveArgs, config: &FormaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args, config)?;
    output(&report, flags.format)
}

pub fn run(args: &ResolveArgs, config: &FormaConfig) -> anyhow::Result<ResolveReport> {
    let client_version = super::client_version(args.client_version.as_deref(), config)?;
    let entries = files::read_entries(&args.entries)?;

    let opts = ResolveOptions {
        industry_type: args.industry.as_deref(),
        schema_type: args.schema_type,
        client_version: &client_version,
        fallback: None,
    };
    let resolved = match resolve(&args.entity, &entries, opts) {
        Ok(Some(Resolved::Entry(entry))) => Some(ResolvedEntry {
            industry_type: entry.industry_type.clone(),
            version: entry.version.clone(),
            min_supported_client: entry.min_supported_client.clone(),
            activated_at: entry.activated_at.map(|at| at.to_rfc3339()),
        }),
        Ok(Some(Resolved::Fallback(_)) | None) => None,
        Err(err) => anyhow::bail!("{}: {err}", err.code()),
    };

    Ok(ResolveReport {
        entity: args.entity.clone(),
        client_version,
        resolved,
    })
}
