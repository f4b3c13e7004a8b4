//! # pulsewatch-api
//!
//! The gateway every dashboard call goes through. It attaches the
//! vault-held credential, dispatches through a [`Transport`], serves and
//! fills the shared response cache for reads, validates mutation payloads
//! before they leave the process, and turns every failure into one
//! user-facing message via the [`ErrorNormalizer`].

pub mod gateway;
pub mod normalizer;
pub mod transport;
pub mod validation;

pub use gateway::{ApiGateway, Mutation, ReadOptions, SessionObserver};
pub use normalizer::{ErrorNormalizer, NormalizedError};
pub use transport::http::HttpTransport;
pub use transport::{ApiRequest, HttpMethod, Transport, TransportFailure, TransportResponse};
pub use validation::{Schema, TypedSchema, ValidationOutcome};
