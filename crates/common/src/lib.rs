//! Shared runtime building blocks for StudyLens crates.
//!
//! - [`auth`]: the credential store that owns the short-lived bearer
//!   credential and its renewal
//! - [`observability`]: the bounded, session-scoped event log
//! - [`error`]: the error taxonomy surfaced by the remote API clients
//! - [`context`]: per-call session id, deadline and cancellation
//! - [`collections`], [`time`]: small supporting primitives
//!
//! Enable the `test-utils` feature to get [`testing`] doubles in downstream
//! test suites.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod collections;
pub mod context;
pub mod error;
pub mod observability;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    Credential, CredentialError, CredentialState, CredentialStore, RenewalClient, RenewedToken,
};
pub use collections::RingBuffer;
pub use context::{CallContext, Interrupted};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use observability::{Event, EventLevel, EventLog, EventQuery};
pub use time::{Clock, SystemClock};
