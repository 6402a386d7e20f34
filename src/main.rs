//! OKU - meditation and well-being companion
//!
#![doc = "OKU - meditation and well-being companion"]
#![doc = "Main entry point for the OKU terminal application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oku::cli::{Cli, Commands};
use oku::commands;
use oku::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Initialize tracing once the log format is known
    init_tracing(cli.verbose, config.logging.json);
    tracing::debug!("Loaded configuration from {}", config_path);

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { kernel, provider } => {
            if let Some(k) = &kernel {
                tracing::debug!("Using kernel override: {}", k);
            }
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }

            // Moves `config` into the handler (match arms are exclusive)
            commands::chat::run_chat(config, kernel, provider).await?;
            Ok(())
        }
        Commands::Kernels { json } => {
            commands::kernels::run_kernels(&config, json)?;
            Ok(())
        }
        Commands::Sos => {
            commands::sos::run_sos()?;
            Ok(())
        }
        Commands::Breathe { cycles } => {
            tracing::info!("Starting breathing session");
            commands::breathe::run_breathe(&config, cycles).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with the conversation.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "oku=debug" } else { "oku=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
