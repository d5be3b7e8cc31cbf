//! Port interfaces for the remote APIs
//!
//! These traits define the boundaries between the tutoring sequence and the
//! HTTP clients. Implementations own credential handling and the
//! retry-once-after-renewal policy; callers only see the typed outcome.

use async_trait::async_trait;
use studylens_common::{ApiResult, CallContext};
use studylens_domain::GenerationRequest;

/// Extracts text from an image
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Returns the recognized text; an image without text yields `""`.
    async fn recognize(&self, image: &[u8], ctx: &CallContext) -> ApiResult<String>;
}

/// Produces text for a generation request
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest, ctx: &CallContext) -> ApiResult<String>;
}
