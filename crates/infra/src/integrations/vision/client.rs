/// Text recognition client
use std::sync::Arc;

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::json;
use studylens_common::{ApiError, ApiResult, CallContext, CredentialStore, EventLog};
use studylens_core::TextRecognizer;
use studylens_domain::constants::TEXT_DETECTION_FEATURE;
use studylens_domain::AppConfig;
use tracing::{debug, info};

use super::types::{
    extract_text, AnalyzeSpec, BatchAnalyzeRequest, BatchAnalyzeResponse, Feature,
    TextDetectionConfig,
};
use crate::http::HttpClient;
use crate::integrations::authorized::AuthorizedCaller;

/// Result of [`RecognitionClient::probe_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: u16,
    pub body: String,
}

impl ProbeOutcome {
    /// `200`, or `400` (payload rejected after authentication passed).
    pub fn authorized(&self) -> bool {
        matches!(self.status, 200 | 400)
    }
}

/// Recognition API client
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    caller: AuthorizedCaller,
    url: String,
    language_codes: Vec<String>,
    model: String,
}

impl RecognitionClient {
    pub fn new(
        http_client: HttpClient,
        credentials: Arc<CredentialStore>,
        events: Arc<EventLog>,
        config: &AppConfig,
    ) -> Self {
        Self {
            caller: AuthorizedCaller::new(
                "Recognition",
                http_client,
                credentials,
                events,
                config.folder_id.clone(),
            ),
            url: config.vision.url.clone(),
            language_codes: config.vision.language_codes.clone(),
            model: config.vision.model.clone(),
        }
    }

    /// Extract the text of `image`.
    ///
    /// # Errors
    /// - [`ApiError::Config`] for an empty image, before any network call
    /// - [`ApiError::MalformedResponse`] when the 2xx body lacks the text tree
    /// - Any error of the authorized send
    pub async fn recognize(&self, image: &[u8], ctx: &CallContext) -> ApiResult<String> {
        let events = self.caller.events();
        let session = ctx.session_id();

        if image.is_empty() {
            let err = ApiError::Config("image is empty".into());
            events.error(format!("Recognition not started: {err}"), session);
            return Err(err);
        }

        events.info(format!("Recognition started ({} bytes)", image.len()), session);
        let body = BatchAnalyzeRequest {
            folder_id: self.caller.folder_id(),
            analyze_specs: vec![AnalyzeSpec {
                content: BASE64_STANDARD.encode(image),
                features: vec![Feature {
                    feature_type: TEXT_DETECTION_FEATURE,
                    text_detection_config: TextDetectionConfig {
                        language_codes: &self.language_codes,
                        model: &self.model,
                    },
                }],
            }],
        };

        let response = self.caller.post_json(&self.url, &body, ctx).await?;
        let parsed: BatchAnalyzeResponse = response
            .json()
            .map_err(|e| self.malformed(format!("invalid JSON: {e}"), session))?;
        let text = extract_text(&parsed).map_err(|detail| self.malformed(detail, session))?;

        if text.is_empty() {
            debug!("Recognition returned no words");
        }
        info!(chars = text.chars().count(), "Text recognized");
        events.success(format!("Text recognized ({} chars)", text.chars().count()), session);
        Ok(text)
    }

    /// Check that the credential is accepted by sending an empty analyze
    /// request once, without the 401 retry.
    ///
    /// # Errors
    /// Credential and transport errors; any HTTP status is an outcome.
    pub async fn probe_auth(&self, ctx: &CallContext) -> ApiResult<ProbeOutcome> {
        let body = json!({ "folderId": self.caller.folder_id(), "analyzeSpecs": [] });
        let response = self.caller.post_once(&self.url, &body, ctx).await?;
        let outcome = ProbeOutcome { status: response.status, body: response.body };

        let message = format!("Recognition auth probe answered {}", outcome.status);
        if outcome.authorized() {
            self.caller.events().success(message, ctx.session_id());
        } else {
            self.caller.events().warning(message, ctx.session_id());
        }
        Ok(outcome)
    }

    fn malformed(&self, detail: String, session: Option<&str>) -> ApiError {
        self.caller.events().error(format!("Recognition response malformed: {detail}"), session);
        ApiError::MalformedResponse(detail)
    }
}

#[async_trait]
impl TextRecognizer for RecognitionClient {
    async fn recognize(&self, image: &[u8], ctx: &CallContext) -> ApiResult<String> {
        RecognitionClient::recognize(self, image, ctx).await
    }
}
