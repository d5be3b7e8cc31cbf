//! Text generation (foundation model completion) integration
//!
//! - **Client**: [`GenerationClient`] - builds the two-message completion
//!   request from a [`GenerationRequest`](studylens_domain::GenerationRequest)
//! - **Types**: completion request/response wire shapes

pub mod client;
pub mod types;

pub use client::GenerationClient;
pub use types::CompletionResponse;
