//! CLI command definitions and dispatch.

pub mod permissions;
pub mod services;
pub mod session;

use clap::{Parser, Subcommand};

use pulsewatch_core::config::AppConfig;
use pulsewatch_core::error::AppError;

use crate::context::AppContext;
use crate::output::OutputFormat;

/// PulseWatch service-monitoring dashboard client
#[derive(Debug, Parser)]
#[command(name = "pulsewatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PULSEWATCH_CONFIG", default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and persist the encrypted session token
    Login(session::LoginArgs),
    /// Sign out and clear the stored token
    Logout,
    /// Show the signed-in user and their capabilities
    Whoami,
    /// Exchange the stored token for a fresh one
    Refresh,
    /// Monitored service management
    Services(services::ServicesArgs),
    /// Show the capability table of a role
    Permissions(permissions::PermissionsArgs),
    /// Check whether a role holds a capability
    Can(permissions::CanArgs),
}

impl Commands {
    /// Whether the command talks to the API (and so needs configuration).
    pub fn needs_backend(&self) -> bool {
        !matches!(self, Self::Permissions(_) | Self::Can(_))
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: Option<AppConfig>) -> Result<(), AppError> {
        match &self.command {
            Commands::Permissions(args) => return permissions::show(args, self.format),
            Commands::Can(args) => return permissions::check(args),
            _ => {}
        }

        let config = config.ok_or_else(|| AppError::configuration("Configuration not loaded"))?;
        let ctx = AppContext::build(&config)?;

        let outcome = match &self.command {
            Commands::Login(args) => session::login(&ctx, args, self.format).await,
            Commands::Logout => session::logout(&ctx).await,
            Commands::Whoami => session::whoami(&ctx, self.format).await,
            Commands::Refresh => session::refresh(&ctx).await,
            Commands::Services(args) => services::execute(&ctx, args, self.format).await,
            Commands::Permissions(_) | Commands::Can(_) => Ok(()),
        };

        ctx.shutdown().await;
        outcome
    }
}
