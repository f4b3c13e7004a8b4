//! Cache key builders.
//!
//! Reads are keyed `METHOD:url` by default. Views that group several
//! logically-equivalent reads use one of the explicit keys below so a
//! mutation can invalidate them in one call.

/// Default key for a request: `method + ":" + url`.
pub fn request_key(method: &str, url: &str) -> String {
    format!("{}:{url}", method.to_uppercase())
}

// ── Services ───────────────────────────────────────────────

/// Prefix shared by every service-related grouping key.
pub const SERVICES_PREFIX: &str = "services:";

/// The service list feeding the main dashboard.
pub fn services_list() -> String {
    format!("{SERVICES_PREFIX}list")
}

/// A single service.
pub fn service_detail(service_id: &str) -> String {
    format!("{SERVICES_PREFIX}detail:{service_id}")
}

/// Health-check history of a service.
pub fn health_checks(service_id: &str) -> String {
    format!("{SERVICES_PREFIX}health:{service_id}")
}

// ── Admin views ────────────────────────────────────────────

/// Alert email recipients.
pub fn alert_emails() -> String {
    "emails:list".to_string()
}

/// User directory.
pub fn users() -> String {
    "users:list".to_string()
}

/// Uptime analytics summary.
pub fn analytics_summary() -> String {
    "analytics:summary".to_string()
}

/// Dashboard settings.
pub fn settings() -> String {
    "settings:current".to_string()
}

/// Super-admin platform overview.
pub fn platform_overview() -> String {
    "superadmin:overview".to_string()
}
