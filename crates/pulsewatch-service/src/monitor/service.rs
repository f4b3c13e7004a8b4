//! Dashboard operations, each guarded by the capability it needs.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use pulsewatch_api::{ApiGateway, Mutation, ReadOptions, TypedSchema};
use pulsewatch_auth::RbacEnforcer;
use pulsewatch_cache::keys;
use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;
use pulsewatch_core::types::ApiEnvelope;
use pulsewatch_entity::analytics::AnalyticsSummary;
use pulsewatch_entity::email::{AlertEmail, NewAlertEmail};
use pulsewatch_entity::permission::Capability;
use pulsewatch_entity::service::{HealthCheck, MonitoredService, ServiceInput};
use pulsewatch_entity::settings::DashboardSettings;
use pulsewatch_entity::user::{Role, RoleChange, SessionUser};

use crate::session::SessionController;

/// Health history goes stale faster than the rest of the dashboard.
const HEALTH_CHECK_TTL: Duration = Duration::from_secs(30);

/// Monitoring dashboard use cases.
///
/// The capability check runs before anything touches the cache or the
/// transport, so a denied call has no side effects.
#[derive(Debug, Clone)]
pub struct MonitorService {
    /// Request path.
    gateway: ApiGateway,
    /// Source of the acting role.
    session: Arc<SessionController>,
    /// RBAC enforcer.
    rbac: RbacEnforcer,
}

impl MonitorService {
    /// Creates a new monitor service.
    pub fn new(gateway: ApiGateway, session: Arc<SessionController>) -> Self {
        Self {
            gateway,
            session,
            rbac: RbacEnforcer::new(),
        }
    }

    fn guard(&self, capability: Capability) -> AppResult<()> {
        if !self.session.is_authenticated() {
            return Err(AppError::authentication("Sign in to continue"));
        }
        self.rbac.require(self.session.role(), capability)
    }

    // ── Services ───────────────────────────────────────────

    /// All monitored services.
    pub async fn list_services(&self) -> AppResult<Vec<MonitoredService>> {
        self.guard(Capability::ViewDashboard)?;
        self.read("/services", ReadOptions::keyed(keys::services_list()))
            .await
    }

    /// One monitored service.
    pub async fn get_service(&self, service_id: &str) -> AppResult<MonitoredService> {
        self.guard(Capability::ViewDashboard)?;
        let id = segment(service_id)?;
        self.read(
            &format!("/services/{id}"),
            ReadOptions::keyed(keys::service_detail(id)),
        )
        .await
    }

    /// Register a new service.
    pub async fn create_service(&self, input: &ServiceInput) -> AppResult<MonitoredService> {
        self.guard(Capability::ManageServices)?;
        let schema = TypedSchema::<ServiceInput>::new();
        let envelope = self
            .gateway
            .mutate(
                Mutation::post("/services")
                    .body(serde_json::to_value(input)?)
                    .schema(&schema)
                    .invalidates_prefix(keys::SERVICES_PREFIX),
            )
            .await?;

        let created: MonitoredService = envelope.data_as()?;
        info!(service_id = %created.id, name = %created.name, "Service created");
        Ok(created)
    }

    /// Replace a service's configuration.
    pub async fn update_service(
        &self,
        service_id: &str,
        input: &ServiceInput,
    ) -> AppResult<MonitoredService> {
        self.guard(Capability::ManageServices)?;
        let id = segment(service_id)?;
        let schema = TypedSchema::<ServiceInput>::new();
        let envelope = self
            .gateway
            .mutate(
                Mutation::put(format!("/services/{id}"))
                    .body(serde_json::to_value(input)?)
                    .schema(&schema)
                    .invalidates_prefix(keys::SERVICES_PREFIX),
            )
            .await?;

        envelope.data_as()
    }

    /// Stop monitoring a service.
    pub async fn delete_service(&self, service_id: &str) -> AppResult<()> {
        self.guard(Capability::DeleteServices)?;
        let id = segment(service_id)?;
        self.gateway
            .mutate(
                Mutation::delete(format!("/services/{id}"))
                    .invalidates_prefix(keys::SERVICES_PREFIX)
                    .invalidates(keys::analytics_summary()),
            )
            .await?;

        info!(service_id = %id, "Service deleted");
        Ok(())
    }

    /// Recent health checks of a service.
    pub async fn health_checks(&self, service_id: &str) -> AppResult<Vec<HealthCheck>> {
        self.guard(Capability::ViewHealthChecks)?;
        let id = segment(service_id)?;
        self.read(
            &format!("/services/{id}/health-checks"),
            ReadOptions::keyed(keys::health_checks(id)).ttl(HEALTH_CHECK_TTL),
        )
        .await
    }

    // ── Alert emails ───────────────────────────────────────

    /// Alert recipients.
    pub async fn alert_emails(&self) -> AppResult<Vec<AlertEmail>> {
        self.guard(Capability::ManageEmails)?;
        self.read("/emails", ReadOptions::keyed(keys::alert_emails()))
            .await
    }

    /// Add an alert recipient.
    pub async fn add_alert_email(&self, email: &str) -> AppResult<AlertEmail> {
        self.guard(Capability::ManageEmails)?;
        let schema = TypedSchema::<NewAlertEmail>::new();
        let body = serde_json::to_value(NewAlertEmail {
            email: email.trim().to_string(),
        })?;
        let envelope = self
            .gateway
            .mutate(
                Mutation::post("/emails")
                    .body(body)
                    .schema(&schema)
                    .invalidates(keys::alert_emails()),
            )
            .await?;

        envelope.data_as()
    }

    /// Remove an alert recipient.
    pub async fn remove_alert_email(&self, email_id: &str) -> AppResult<()> {
        self.guard(Capability::ManageEmails)?;
        let id = segment(email_id)?;
        self.gateway
            .mutate(Mutation::delete(format!("/emails/{id}")).invalidates(keys::alert_emails()))
            .await?;
        Ok(())
    }

    // ── Users ──────────────────────────────────────────────

    /// User directory.
    pub async fn list_users(&self) -> AppResult<Vec<SessionUser>> {
        self.guard(Capability::ManageUsers)?;
        self.read("/users", ReadOptions::keyed(keys::users())).await
    }

    /// Assign `role` to another user.
    pub async fn change_user_role(&self, user_id: &str, role: Role) -> AppResult<SessionUser> {
        self.guard(Capability::ManageUsers)?;
        let id = segment(user_id)?;
        let schema = TypedSchema::<RoleChange>::new();
        let envelope = self
            .gateway
            .mutate(
                Mutation::patch(format!("/users/{id}/role"))
                    .body(serde_json::to_value(RoleChange { role })?)
                    .schema(&schema)
                    .invalidates(keys::users()),
            )
            .await?;

        info!(user_id = %id, %role, "User role changed");
        envelope.data_as()
    }

    // ── Analytics, settings, platform ──────────────────────

    /// Uptime summary.
    pub async fn analytics_summary(&self) -> AppResult<AnalyticsSummary> {
        self.guard(Capability::ViewAnalytics)?;
        self.read(
            "/analytics/summary",
            ReadOptions::keyed(keys::analytics_summary()),
        )
        .await
    }

    /// Dashboard-wide settings.
    pub async fn settings(&self) -> AppResult<DashboardSettings> {
        self.guard(Capability::ManageSettings)?;
        self.read("/settings", ReadOptions::keyed(keys::settings()))
            .await
    }

    /// Replace the dashboard-wide settings.
    pub async fn update_settings(
        &self,
        settings: &DashboardSettings,
    ) -> AppResult<DashboardSettings> {
        self.guard(Capability::ManageSettings)?;
        let schema = TypedSchema::<DashboardSettings>::new();
        let envelope = self
            .gateway
            .mutate(
                Mutation::put("/settings")
                    .body(serde_json::to_value(settings)?)
                    .schema(&schema)
                    .invalidates(keys::settings()),
            )
            .await?;

        envelope.data_as()
    }

    /// Cross-tenant overview for super administrators.
    pub async fn platform_overview(&self) -> AppResult<Value> {
        self.guard(Capability::AccessSuperAdmin)?;
        self.read(
            "/superadmin/overview",
            ReadOptions::keyed(keys::platform_overview()),
        )
        .await
    }

    async fn read<T: DeserializeOwned>(&self, path: &str, options: ReadOptions) -> AppResult<T> {
        let envelope: ApiEnvelope = self.gateway.get(path, options).await?;
        envelope.data_as()
    }
}

/// A single path segment supplied by the caller.
fn segment(id: &str) -> AppResult<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(AppError::validation(format!("Invalid identifier '{id}'")));
    }
    Ok(id)
}
