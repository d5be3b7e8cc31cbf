//! # StudyLens Infrastructure
//!
//! Adapters behind the `studylens-core` ports.
//!
//! This crate contains:
//! - The single-attempt [`HttpClient`]
//! - The identity renewal client plus the recognition and generation clients
//! - Configuration loading and tracing setup
//! - [`AppContext`], the composition root
//!
//! ## Architecture
//! - Implements traits defined in `studylens-core` and `studylens-common`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod context;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use context::AppContext;
pub use http::{HttpClient, HttpError, HttpResponse};
pub use integrations::{
    AuthorizedCaller, GenerationClient, IdentityClient, ProbeOutcome, RecognitionClient,
};
pub use observability::{init_tracing, LogFormat};
