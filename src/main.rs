//! slidecraft - Turn a topic into a PowerPoint deck
//!
//! Entry point for the slidecraft CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use slidecraft::cli::{Cli, Commands};
use slidecraft::config::Settings;

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            slidecraft::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            dotenvy::dotenv().ok();
            let settings = Settings::load()?;

            let level = if cli.verbose {
                "debug"
            } else {
                settings.general.log_level.as_str()
            };
            init_logging(level);

            let config_path = Settings::config_path()?;
            if config_path.exists() {
                tracing::debug!("Loaded config from {}", config_path.display());
            } else {
                tracing::debug!("No config file found, using defaults");
            }

            // Execute command
            match command {
                Commands::Generate {
                    topic,
                    output,
                    slides,
                } => {
                    slidecraft::cli::commands::generate_deck(&settings, topic, output, slides)
                        .await?;
                }
                Commands::Build {
                    input,
                    output,
                    title,
                } => {
                    slidecraft::cli::commands::build_deck(&settings, &input, output, title)?;
                }
                Commands::Doctor { json } => {
                    slidecraft::cli::commands::run_doctor(&settings, json)?;
                }
                Commands::Config(config_cmd) => {
                    slidecraft::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
