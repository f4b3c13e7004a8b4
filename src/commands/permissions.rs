//! Offline capability-table commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use pulsewatch_auth::PermissionEngine;
use pulsewatch_core::error::AppError;
use pulsewatch_entity::permission::Capability;
use pulsewatch_entity::user::Role;

use crate::output::{self, OutputFormat};

/// Arguments for `permissions`
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Role to describe (USER, ADMIN, SUPERADMIN)
    #[arg(short, long)]
    pub role: Role,
}

/// Arguments for `can`
#[derive(Debug, Args)]
pub struct CanArgs {
    /// Role to check (USER, ADMIN, SUPERADMIN)
    #[arg(short, long)]
    pub role: Role,

    /// Capability name, e.g. canDeleteServices
    #[arg(short, long)]
    pub capability: Capability,
}

/// Capability display row
#[derive(Debug, Serialize, Tabled)]
struct CapabilityRow {
    /// Capability
    capability: String,
    /// Granted
    granted: String,
}

/// Print the capability table of a role.
pub fn show(args: &PermissionsArgs, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => output::print_item(&PermissionEngine::permissions_for(args.role), format),
        OutputFormat::Table => {
            let rows: Vec<CapabilityRow> = Capability::ALL
                .into_iter()
                .map(|cap| CapabilityRow {
                    capability: cap.as_str().to_string(),
                    granted: if PermissionEngine::has_capability(args.role, cap) {
                        "✓"
                    } else {
                        "✗"
                    }
                    .to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Report whether a role holds a capability; denial is an error exit.
pub fn check(args: &CanArgs) -> Result<(), AppError> {
    if PermissionEngine::has_capability(args.role, args.capability) {
        output::print_success(&format!("{} has {}", args.role, args.capability));
        return Ok(());
    }

    let allowed: Vec<&str> = PermissionEngine::minimum_roles_for(args.capability)
        .iter()
        .map(Role::as_str)
        .collect();
    output::print_warning(&format!(
        "{} lacks {} (granted to: {})",
        args.role,
        args.capability,
        allowed.join(", ")
    ));
    Err(AppError::authorization(format!(
        "{} does not have {}",
        args.role, args.capability
    )))
}
