use forma_config::FormaConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, config: &FormaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, flags),
        Commands::Resolve(args) => commands::resolve::handle(&args, config, flags),
        Commands::Migrate(args) => commands::migrate::handle(&args, flags),
        Commands::Evaluate(args) => commands::evaluate::handle(&args, flags),
        Commands::Load(args) => commands::load::handle(&args, config, flags).await,
    }
}
