//! Monitored service CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use pulsewatch_core::error::AppError;
use pulsewatch_entity::service::{HealthCheck, MonitoredService, ServiceInput};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for service commands
#[derive(Debug, Args)]
pub struct ServicesArgs {
    /// Service subcommand
    #[command(subcommand)]
    pub command: ServicesCommand,
}

/// Service subcommands
#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List monitored services
    List,
    /// Show one service
    Show {
        /// Service ID
        id: String,
    },
    /// Start monitoring a service
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// URL to probe
        #[arg(short, long)]
        url: String,
        /// Probe interval in seconds
        #[arg(short, long, default_value_t = 60)]
        interval: u32,
    },
    /// Change a service's configuration
    Update {
        /// Service ID
        id: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// URL to probe
        #[arg(short, long)]
        url: String,
        /// Probe interval in seconds
        #[arg(short, long, default_value_t = 60)]
        interval: u32,
    },
    /// Stop monitoring a service
    Delete {
        /// Service ID
        id: String,
    },
    /// Show recent health checks
    Health {
        /// Service ID
        id: String,
    },
}

/// Service display row
#[derive(Debug, Serialize, Tabled)]
struct ServiceRow {
    /// ID
    id: String,
    /// Name
    name: String,
    /// URL
    url: String,
    /// Interval
    interval: String,
    /// Status
    status: String,
    /// Paused
    paused: String,
}

impl From<&MonitoredService> for ServiceRow {
    fn from(s: &MonitoredService) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            url: s.url.clone(),
            interval: format!("{}s", s.interval_seconds),
            status: format!("{:?}", s.status).to_lowercase(),
            paused: if s.paused { "✓" } else { "✗" }.to_string(),
        }
    }
}

/// Health check display row
#[derive(Debug, Serialize, Tabled)]
struct HealthRow {
    /// Checked at
    checked_at: String,
    /// Status
    status: String,
    /// HTTP status
    code: String,
    /// Response time
    response_ms: String,
}

impl From<&HealthCheck> for HealthRow {
    fn from(h: &HealthCheck) -> Self {
        Self {
            checked_at: h.checked_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            status: format!("{:?}", h.status).to_lowercase(),
            code: h.status_code.map_or_else(|| "-".to_string(), |c| c.to_string()),
            response_ms: h
                .response_time_ms
                .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms")),
        }
    }
}

/// Execute service commands
pub async fn execute(
    ctx: &AppContext,
    args: &ServicesArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    ctx.resume().await?;

    match &args.command {
        ServicesCommand::List => {
            let services = ctx.monitor.list_services().await?;
            let rows: Vec<ServiceRow> = services.iter().map(ServiceRow::from).collect();
            output::print_list(&rows, format);
        }
        ServicesCommand::Show { id } => {
            let service = ctx.monitor.get_service(id).await?;
            output::print_item(&service, format);
        }
        ServicesCommand::Add {
            name,
            url,
            interval,
        } => {
            let created = ctx
                .monitor
                .create_service(&ServiceInput::new(name, url, *interval))
                .await?;
            output::print_success(&format!("Service '{}' created ({})", created.name, created.id));
        }
        ServicesCommand::Update {
            id,
            name,
            url,
            interval,
        } => {
            let updated = ctx
                .monitor
                .update_service(id, &ServiceInput::new(name, url, *interval))
                .await?;
            output::print_success(&format!("Service '{}' updated", updated.name));
        }
        ServicesCommand::Delete { id } => {
            ctx.monitor.delete_service(id).await?;
            output::print_success(&format!("Service {id} deleted"));
        }
        ServicesCommand::Health { id } => {
            let checks = ctx.monitor.health_checks(id).await?;
            let rows: Vec<HealthRow> = checks.iter().map(HealthRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
