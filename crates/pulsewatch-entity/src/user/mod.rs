//! User domain entities.

pub mod model;
pub mod role;

pub use model::{AuthPayload, LoginCredentials, RoleChange, SessionUser};
pub use role::Role;
