//! Credential vault configuration.

use serde::{Deserialize, Serialize};

/// Settings for the encrypted session-credential slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Process-wide symmetric secret the credential is encrypted under.
    #[serde(default)]
    pub secret: String,
    /// File the ciphertext is persisted in.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            storage_path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "data/pulsewatch-storage.json".to_string()
}
