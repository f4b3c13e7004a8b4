//! Authenticated encryption of the credential into a cipher blob.
//!
//! Blob layout: `v1.` followed by standard base64 of
//! `nonce (12 bytes) || ciphertext || GCM tag (16 bytes)`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hkdf::Hkdf;
use sha2::Sha256;

use pulsewatch_core::error::AppError;

/// Version prefix of every blob this cipher produces.
const BLOB_PREFIX: &str = "v1.";
/// HKDF salt binding derived keys to this use.
const KDF_SALT: &[u8] = b"pulsewatch.token-vault";
/// HKDF info label for the AES key.
const KDF_INFO: &[u8] = b"aes-256-gcm key v1";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM cipher keyed from the process-wide secret.
#[derive(Clone)]
pub struct VaultCipher {
    /// The keyed AEAD instance.
    aead: Aes256Gcm,
}

impl std::fmt::Debug for VaultCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCipher").finish_non_exhaustive()
    }
}

impl VaultCipher {
    /// Derive the encryption key from `secret` with HKDF-SHA256.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::vault("Vault secret must not be empty"));
        }

        let hkdf = Hkdf::<Sha256>::new(Some(KDF_SALT), secret.as_bytes());
        let mut key = [0u8; 32];
        hkdf.expand(KDF_INFO, &mut key)
            .map_err(|e| AppError::vault(format!("Key derivation failed: {e}")))?;

        Ok(Self {
            aead: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
        })
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    pub fn seal(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .aead
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AppError::vault(format!("Encryption failed: {e}")))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(format!("{BLOB_PREFIX}{}", STANDARD.encode(raw)))
    }

    /// Decrypt a blob produced by [`Self::seal`].
    ///
    /// Returns `None` if the blob is malformed, truncated, tampered with,
    /// or was sealed under a different secret.
    pub fn open(&self, blob: &str) -> Option<String> {
        let encoded = blob.strip_prefix(BLOB_PREFIX)?;
        let raw = STANDARD.decode(encoded.trim()).ok()?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return None;
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .aead
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok()?;

        String::from_utf8(plaintext).ok()
    }
}
