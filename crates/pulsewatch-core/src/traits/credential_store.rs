//! Persisted key/value storage for the session credential.

use async_trait::async_trait;

use crate::result::AppResult;

/// Local persisted string storage, the equivalent of a browser's
/// `localStorage`. Reads and writes are suspension points.
///
/// Only the token vault writes to this store; every other component
/// receives the decrypted credential from the vault.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read the value stored under `key`, if any.
    async fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
