//! Identity endpoint: exchanges the refresh secret for a bearer token
//!
//! Implements [`RenewalClient`](studylens_common::RenewalClient) so the
//! credential store stays free of HTTP code.

pub mod client;
pub mod types;

pub use client::IdentityClient;
