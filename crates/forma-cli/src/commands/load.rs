use std::sync::Arc;

use forma_config::FormaConfig;
use forma_registry::{LoadRequest, LoadedSchema, LoaderOptions, SchemaLoader};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LoadArgs;
use crate::files::{self, FileRegistry};
use crate::output::output;

/// Handle `forma load`.
pub async fn handle(args: &LoadArgs, config: &FormaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let loaded = run(args, config).await?;
    output(&loaded, flags.format)
}

/// Run the loading pipeline with the registry and translations read from
/// files. Tenant, locale, and client version fall back to config.
pub async fn run(args: &LoadArgs, config: &FormaConfig) -> anyhow::Result<LoadedSchema> {
    let entries = files::read_entries(&args.entries)?;
    let mut loader = SchemaLoader::new(Arc::new(FileRegistry::new(entries)))?.with_options(LoaderOptions {
        cache_enabled: config.loader.cache_enabled,
        load_translations: config.loader.load_translations,
    });

    if let Some(path) = &args.translations {
        loader = loader.with_static_translations(files::read_translations(path)?);
    }
    if let Some(path) = config.loader.fallback_path(&args.entity, args.schema_type.as_str()) {
        if let Some(doc) = files::read_fallback(&path)? {
            tracing::debug!(path = %path.display(), "registered local fallback");
            loader = loader.with_fallback(doc);
        }
    }

    let req = LoadRequest {
        tenant_id: args.tenant.clone().unwrap_or_else(|| config.general.default_tenant.clone()),
        entity: args.entity.clone(),
        schema_type: args.schema_type,
        locale: args.locale.clone().unwrap_or_else(|| config.client.default_locale.clone()),
        client_version: super::client_version(args.client_version.as_deref(), config)?,
        industry_type: args.industry.clone(),
    };

    match loader.load_schema(&req).await {
        Ok(loaded) => Ok(loaded),
        Err(err) => anyhow::bail!("{}: {err}", err.code()),
    }
}
