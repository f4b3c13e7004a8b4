//! Core traits defined in `pulsewatch-core` and implemented by other crates.

pub mod credential_store;

pub use credential_store::CredentialStore;
