//! Client session lifecycle states.

pub mod state;

pub use state::{SessionState, SessionTransition};
