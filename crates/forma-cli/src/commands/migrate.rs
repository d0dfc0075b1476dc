use anyhow::Context;
use forma_core::document::SchemaDocument;
use forma_core::enums::SchemaSource;
use forma_core::version::parse_version;
use forma_schema::{MigrationSet, SchemaValidator};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MigrateArgs;
use crate::files;
use crate::output::output;

/// Handle `forma migrate`.
pub fn handle(args: &MigrateArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let migrated = run(args)?;
    output(&migrated, flags.format)
}

/// Migrate the document to `--to` and validate the result.
pub fn run(args: &MigrateArgs) -> anyhow::Result<SchemaDocument> {
    let target = parse_version(&args.to).context("invalid --to version")?;
    let validator = SchemaValidator::new()?;

    let value = files::read_document_value(&args.file)?;
    let doc = validator
        .validate_value(&value, SchemaSource::Registry)
        .with_context(|| format!("{} is not a valid schema document", args.file.display()))?;

    let rules_json = std::fs::read_to_string(&args.rules)
        .with_context(|| format!("failed to read {}", args.rules.display()))?;
    let rules = MigrationSet::from_json(&rules_json)?;
    tracing::debug!(rules = rules.len(), from = %doc.version, to = %target, "migrating document");

    let migrated = rules.migrate(&doc, &target)?;
    validator
        .validate(&migrated, SchemaSource::Registry)
        .context("migrated document failed validation")?;
    Ok(migrated)
}
