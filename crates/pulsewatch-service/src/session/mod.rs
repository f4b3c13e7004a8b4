//! Client session lifecycle.

pub mod controller;

pub use controller::SessionController;
