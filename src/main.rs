//! Cofound - console client for the co-founder agent
//!
#![doc = "Cofound - console client for the co-founder agent"]
#![doc = "Main entry point for the cofound application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cofound::cli::{Cli, Commands, ProfileCommand, SessionCommand};
use cofound::commands;
use cofound::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { thread } => {
            tracing::info!("Starting interactive console");
            if let Some(t) = &thread {
                tracing::debug!("Resuming thread: {}", t);
            }
            commands::console::run_console(config, thread).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionCommand::List { json } => {
                commands::sessions::list(&config, json).await?;
                Ok(())
            }
            SessionCommand::Pin { thread } => {
                commands::sessions::pin(&config, &thread).await?;
                Ok(())
            }
            SessionCommand::Rename { thread, name } => {
                commands::sessions::rename(&config, &thread, &name).await?;
                Ok(())
            }
            SessionCommand::Delete { thread, yes } => {
                commands::sessions::delete(&config, &thread, yes).await?;
                Ok(())
            }
        },
        Commands::Board { thread } => {
            commands::board::show(&config, &thread).await?;
            Ok(())
        }
        Commands::Profile { command } => match command {
            ProfileCommand::Get => {
                commands::profile::get(&config).await?;
                Ok(())
            }
            ProfileCommand::Set { content, file } => {
                commands::profile::set(&config, content, file.as_deref()).await?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cofound=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
