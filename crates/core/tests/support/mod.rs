//! Scripted port implementations for tutor tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use studylens_common::{ApiResult, CallContext};
use studylens_core::{TextGenerator, TextRecognizer};
use studylens_domain::GenerationRequest;

/// Returns the same outcome for every image and records what it was given.
#[derive(Default)]
pub struct ScriptedRecognizer {
    outcome: Option<ApiResult<String>>,
    pub images: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedRecognizer {
    pub fn returning(outcome: ApiResult<String>) -> Self {
        Self { outcome: Some(outcome), images: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, image: &[u8], _ctx: &CallContext) -> ApiResult<String> {
        self.images.lock().push(image.to_vec());
        self.outcome.clone().unwrap_or_else(|| Ok(String::new()))
    }
}

/// Returns the same outcome for every request; defaults to echoing the
/// directive.
#[derive(Default)]
pub struct ScriptedGenerator {
    outcome: Option<ApiResult<String>>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn returning(outcome: ApiResult<String>) -> Self {
        Self { outcome: Some(outcome), requests: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest, _ctx: &CallContext) -> ApiResult<String> {
        self.requests.lock().push(request.clone());
        self.outcome.clone().unwrap_or_else(|| Ok(format!("generated: {}", request.directive)))
    }
}
