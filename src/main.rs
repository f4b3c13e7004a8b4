//! PulseWatch command-line client.
//!
//! Wires configuration, logging, the token vault, the response cache and the
//! API gateway together, then runs one dashboard command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use pulsewatch_core::config::{AppConfig, LoggingConfig};
use pulsewatch_core::error::AppError;

mod commands;
mod context;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = if cli.command.needs_backend() {
        match load_configuration(&cli.config) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Failed to load configuration: {}", e.message);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    init_logging(
        config
            .as_ref()
            .map(|c| &c.logging)
            .unwrap_or(&LoggingConfig::default()),
    );

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.message);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration(path: &str) -> Result<AppConfig, AppError> {
    tracing::debug!(path, "Loading configuration");
    AppConfig::load(path)
}

/// Initialize tracing. Logs go to stderr so command output stays parseable.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
