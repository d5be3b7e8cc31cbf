//! Text recognition (batch analyze) integration
//!
//! - **Client**: [`RecognitionClient`] - base64-encodes the image, requests
//!   `TEXT_DETECTION` and flattens the word tree into one string
//! - **Types**: request/response wire shapes and [`extract_text`]

pub mod client;
pub mod types;

pub use client::{ProbeOutcome, RecognitionClient};
pub use types::{extract_text, BatchAnalyzeResponse};
