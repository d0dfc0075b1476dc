use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `forma` binary.
#[derive(Debug, Parser)]
#[command(name = "forma", version, about = "Forma - schema-driven form rules and resolution")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use forma_core::enums::SchemaType;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["forma", "--format", "raw", "--verbose", "validate", "student.json"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.file.to_str(), Some("student.json"));
        assert!(!args.fallback);
    }

    #[test]
    fn load_parses_schema_type() {
        let cli = Cli::try_parse_from([
            "forma",
            "load",
            "--entries",
            "entries.json",
            "--entity",
            "student",
            "--type",
            "table",
            "--client-version",
            "1.4.0",
        ])
        .expect("cli should parse");

        let Commands::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.schema_type, SchemaType::Table);
        assert_eq!(args.client_version.as_deref(), Some("1.4.0"));
        assert!(args.tenant.is_none());
    }

    #[test]
    fn migrate_requires_target() {
        assert!(Cli::try_parse_from(["forma", "migrate", "doc.json", "--rules", "rules.json"]).is_err());
    }
}
