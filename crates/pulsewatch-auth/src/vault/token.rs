//! The token vault: the only reader and writer of the persisted credential.

use std::sync::Arc;

use tracing::{debug, warn};

use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;
use pulsewatch_core::traits::CredentialStore;

use super::cipher::VaultCipher;

/// Storage key of the credential slot.
pub const TOKEN_KEY: &str = "token";

/// A bearer token held in memory. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The plaintext token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Result of reading the credential slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEntry {
    /// Nothing is stored.
    Absent,
    /// A credential decrypted and authenticated successfully.
    Present(Credential),
    /// Something is stored but it does not decrypt under the current secret.
    Corrupt,
}

impl VaultEntry {
    /// The credential, if one was present.
    pub fn into_credential(self) -> Option<Credential> {
        match self {
            Self::Present(credential) => Some(credential),
            Self::Absent | Self::Corrupt => None,
        }
    }

    /// Whether nothing is stored.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Encrypts, persists and recovers the session credential.
#[derive(Debug, Clone)]
pub struct TokenVault {
    /// Persisted storage.
    store: Arc<dyn CredentialStore>,
    /// Cipher keyed from the process-wide secret.
    cipher: VaultCipher,
}

impl TokenVault {
    /// Create a vault over `store`, keyed from `secret`.
    pub fn new(store: Arc<dyn CredentialStore>, secret: &str) -> AppResult<Self> {
        Ok(Self {
            store,
            cipher: VaultCipher::new(secret)?,
        })
    }

    /// Encrypt `token` and persist it, overwriting any prior value.
    pub async fn store(&self, token: &str) -> AppResult<()> {
        if token.is_empty() {
            return Err(AppError::vault("Refusing to store an empty credential"));
        }
        let blob = self.cipher.seal(token)?;
        self.store.write(TOKEN_KEY, &blob).await?;
        debug!("Credential stored");
        Ok(())
    }

    /// Read and decrypt the persisted credential.
    pub async fn retrieve(&self) -> AppResult<VaultEntry> {
        let Some(blob) = self.store.read(TOKEN_KEY).await? else {
            return Ok(VaultEntry::Absent);
        };

        Ok(match self.cipher.open(&blob) {
            Some(token) if !token.is_empty() => VaultEntry::Present(Credential::new(token)),
            _ => VaultEntry::Corrupt,
        })
    }

    /// Remove the persisted credential.
    pub async fn clear(&self) -> AppResult<()> {
        self.store.remove(TOKEN_KEY).await?;
        debug!("Credential cleared");
        Ok(())
    }

    /// The usable credential, if any.
    ///
    /// A corrupt slot is cleared and reported as no credential.
    pub async fn credential(&self) -> AppResult<Option<Credential>> {
        match self.retrieve().await? {
            VaultEntry::Present(credential) => Ok(Some(credential)),
            VaultEntry::Absent => Ok(None),
            VaultEntry::Corrupt => {
                warn!("Stored credential failed authentication; clearing it");
                self.clear().await?;
                Ok(None)
            }
        }
    }
}
