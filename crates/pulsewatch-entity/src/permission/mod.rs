//! Capability and permission-set value objects.

pub mod capability;
pub mod set;

pub use capability::Capability;
pub use set::PermissionSet;
