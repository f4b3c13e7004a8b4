//! Encrypted persistence of the session credential.

pub mod cipher;
pub mod store;
pub mod token;

pub use cipher::VaultCipher;
pub use store::{FileCredentialStore, MemoryCredentialStore};
pub use token::{Credential, TOKEN_KEY, TokenVault, VaultEntry};
