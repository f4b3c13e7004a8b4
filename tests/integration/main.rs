//! Workspace integration tests: the full client core over an in-process transport.

mod gateway_test;
mod helpers;
mod permission_test;
mod session_test;
