//! Telegram Clone Chat CLI - main entry point

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use clone_chat::commands::{self, CleanupOutcome};
use clone_chat::config::load_dotenv;
use clone_chat::{parse_from, Commands, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development; CLONE_CHAT_CONFIG may come from it
    load_dotenv();

    let cli = parse_from(std::env::args_os()).unwrap_or_else(|err| err.exit());

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("clone_chat={}", cli.loglevel.as_filter()).parse()?),
        )
        .init();

    let Some(command) = cli.command else {
        debug!(loglevel = %cli.loglevel, "No subcommand given, nothing to do");
        return Ok(());
    };

    debug!(command = command.name(), loglevel = %cli.loglevel, "Parsed arguments");

    let config = Config::load(&cli.config)?;

    match command {
        Commands::Clone(args) => {
            let bytes = commands::clone_run(&args, &config).await?;
            info!("Done: {} bytes written", bytes);
        }
        Commands::Cleanup => match commands::cleanup_run(&config).await? {
            CleanupOutcome::Removed => info!("Cleanup finished"),
            CleanupOutcome::NothingToDo => debug!("Cleanup had nothing to remove"),
        },
    }

    Ok(())
}
