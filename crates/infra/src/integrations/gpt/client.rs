/// Text generation client
use std::sync::Arc;

use async_trait::async_trait;
use studylens_common::{ApiError, ApiResult, CallContext, CredentialStore, EventLog};
use studylens_core::TextGenerator;
use studylens_domain::{AppConfig, GenerationRequest};
use tracing::info;

use super::types::{CompletionRequest, CompletionResponse};
use crate::http::HttpClient;
use crate::integrations::authorized::AuthorizedCaller;

/// Completion API client
///
/// Temperature and token budget come from the request's
/// [`GenerationKind`](studylens_domain::GenerationKind), never from the caller.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    caller: AuthorizedCaller,
    url: String,
    model_uri: String,
}

impl GenerationClient {
    pub fn new(
        http_client: HttpClient,
        credentials: Arc<CredentialStore>,
        events: Arc<EventLog>,
        config: &AppConfig,
    ) -> Self {
        Self {
            caller: AuthorizedCaller::new(
                "Generation",
                http_client,
                credentials,
                events,
                config.folder_id.clone(),
            ),
            url: config.generation.url.clone(),
            model_uri: config.model_uri(),
        }
    }

    pub fn model_uri(&self) -> &str {
        &self.model_uri
    }

    /// Explain `content`, following `instruction` or the default one.
    ///
    /// # Errors
    /// See [`GenerationClient::generate`].
    pub async fn explain(
        &self,
        content: &str,
        instruction: Option<&str>,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        self.generate(&GenerationRequest::explanation(content, instruction), ctx).await
    }

    /// # Errors
    /// See [`GenerationClient::generate`].
    pub async fn answer(
        &self,
        content: &str,
        question: &str,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        self.generate(&GenerationRequest::answer(content, question), ctx).await
    }

    /// # Errors
    /// See [`GenerationClient::generate`].
    pub async fn examples(
        &self,
        content: &str,
        topic: &str,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        self.generate(&GenerationRequest::examples(content, topic), ctx).await
    }

    /// Send one completion request and return the first alternative's text.
    ///
    /// # Errors
    /// - [`ApiError::MalformedResponse`] when the 2xx body lacks the text
    /// - Any error of the authorized send
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        let session = ctx.session_id();
        let events = self.caller.events();
        events.info(format!("Generation started ({})", request.kind), session);

        let user_text = request.user_message();
        let body = CompletionRequest::build(&self.model_uri, request, &user_text);
        let response = self.caller.post_json(&self.url, &body, ctx).await?;

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| self.malformed(format!("invalid JSON: {e}"), session))?;
        let text = parsed.into_text().map_err(|detail| self.malformed(detail, session))?;

        info!(kind = %request.kind, chars = text.chars().count(), "Text generated");
        events.success(
            format!("Generated {} ({} chars)", request.kind, text.chars().count()),
            session,
        );
        Ok(text)
    }

    fn malformed(&self, detail: String, session: Option<&str>) -> ApiError {
        self.caller.events().error(format!("Generation response malformed: {detail}"), session);
        ApiError::MalformedResponse(detail)
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest, ctx: &CallContext) -> ApiResult<String> {
        GenerationClient::generate(self, request, ctx).await
    }
}
