//! instareport - Customer feedback analytics and weekly PDF report pipeline
//!
//! Entry point for the instareport CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use instareport::cli::{Cli, Commands};
use instareport::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            instareport::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Generate {
                    company_id,
                    from,
                    to,
                    no_upload,
                    no_email,
                } => {
                    instareport::cli::commands::generate_report(
                        &settings, &company_id, from, to, no_upload, no_email,
                    )
                    .await?;
                }
                Commands::Batch { limit } => {
                    instareport::cli::commands::run_batch(&settings, limit).await?;
                }
                Commands::Serve { port } => {
                    instareport::server::run(settings.clone(), port).await?;
                }
                Commands::Config(config_cmd) => {
                    instareport::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
