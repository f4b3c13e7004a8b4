//! Alert email recipients.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A recipient of downtime alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEmail {
    /// Server-side identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Recipient address.
    pub email: String,
}

/// Payload for registering a recipient.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAlertEmail {
    /// Recipient address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}
