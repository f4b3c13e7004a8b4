//! # pulsewatch-auth
//!
//! Client-side credential protection and authorization for PulseWatch.
//!
//! ## Modules
//!
//! - `vault` - AES-256-GCM encryption of the session token and its persisted slot
//! - `rbac` - the role → capability table and its enforcement

pub mod rbac;
pub mod vault;

pub use rbac::{PermissionEngine, RbacEnforcer};
pub use vault::{Credential, FileCredentialStore, MemoryCredentialStore, TokenVault, VaultEntry};
