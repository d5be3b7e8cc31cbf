//! Bearer credential lifecycle.
//!
//! ```text
//! API clients ──get_token(force)──► CredentialStore (single-flight)
//!                                         │
//!                                         └──renew(secret)──► RenewalClient
//! ```
//!
//! The store is constructed once at startup and shared as `Arc` by every
//! client. The HTTP side of renewal lives in the infra crate behind the
//! [`RenewalClient`] trait.

pub mod credential;
pub mod error;
pub mod store;
pub mod traits;

pub use credential::{Credential, RenewedToken};
pub use error::CredentialError;
pub use store::{CredentialState, CredentialStore, DEFAULT_CREDENTIAL_LIFETIME};
pub use traits::RenewalClient;
