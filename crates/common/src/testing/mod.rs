//! Test doubles for the credential and event-log layers
//!
//! - **[`time`]**: a settable, advanceable [`MockClock`]
//! - **[`mocks`]**: a scripted [`MockRenewalClient`]
//!
//! Available to downstream crates through the `test-utils` feature.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use studylens_common::testing::{MockClock, MockRenewalClient};
//! use studylens_common::CredentialStore;
//!
//! let clock = Arc::new(MockClock::new());
//! let renewal = Arc::new(MockRenewalClient::new());
//! let store = CredentialStore::new(renewal, Some("refresh".into()), Duration::from_secs(300))
//!     .with_clock(clock.clone());
//! clock.advance(Duration::from_secs(5));
//! # let _ = store;
//! ```

pub mod mocks;
pub mod time;

pub use mocks::MockRenewalClient;
pub use time::MockClock;
