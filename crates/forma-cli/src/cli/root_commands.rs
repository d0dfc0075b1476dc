use std::path::PathBuf;

use clap::{Args, Subcommand};
use forma_core::enums::SchemaType;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate a schema document (JSON or TOML).
    Validate(ValidateArgs),
    /// Pick the registry entry that applies to an entity.
    Resolve(ResolveArgs),
    /// Migrate a document to a newer version.
    Migrate(MigrateArgs),
    /// Evaluate conditions and constraints against a value map.
    Evaluate(EvaluateArgs),
    /// Run the full loading pipeline against file-backed collaborators.
    Load(LoadArgs),
}

/// Arguments for `forma validate`.
#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    pub file: PathBuf,
    /// Treat the document as a local fallback instead of a registry document.
    #[arg(long)]
    pub fallback: bool,
}

/// Arguments for `forma resolve`.
#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    /// JSON array of registry entries.
    pub entries: PathBuf,
    #[arg(long)]
    pub entity: String,
    #[arg(long)]
    pub industry: Option<String>,
    /// Skip entries whose document declares another type.
    #[arg(long = "type", value_parser = parse_schema_type)]
    pub schema_type: Option<SchemaType>,
    /// Defaults to `client.version` from config.
    #[arg(long)]
    pub client_version: Option<String>,
}

/// Arguments for `forma migrate`.
#[derive(Clone, Debug, Args)]
pub struct MigrateArgs {
    pub file: PathBuf,
    /// Target version.
    #[arg(long)]
    pub to: String,
    /// JSON array of migration rules.
    #[arg(long)]
    pub rules: PathBuf,
}

/// Arguments for `forma evaluate`.
#[derive(Clone, Debug, Args)]
pub struct EvaluateArgs {
    pub file: PathBuf,
    /// JSON object of field values.
    #[arg(long)]
    pub values: PathBuf,
}

/// Arguments for `forma load`.
#[derive(Clone, Debug, Args)]
pub struct LoadArgs {
    /// JSON array of registry entries.
    #[arg(long)]
    pub entries: PathBuf,
    /// JSON object of stored translations.
    #[arg(long)]
    pub translations: Option<PathBuf>,
    /// Defaults to `general.default_tenant` from config.
    #[arg(long)]
    pub tenant: Option<String>,
    #[arg(long)]
    pub entity: String,
    #[arg(long = "type", value_parser = parse_schema_type)]
    pub schema_type: SchemaType,
    /// Defaults to `client.default_locale` from config.
    #[arg(long)]
    pub locale: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    /// Defaults to `client.version` from config.
    #[arg(long)]
    pub client_version: Option<String>,
}

fn parse_schema_type(value: &str) -> Result<SchemaType, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown schema type '{value}' (expected form, table, detail, filter, widget)"))
}
