//! Tutoring service - sequences the two remote calls

use std::sync::Arc;

use studylens_common::{ApiError, ApiResult, CallContext, EventLog};
use studylens_domain::{GenerationRequest, PageAnalysis};
use tracing::debug;

use super::ports::{TextGenerator, TextRecognizer};

/// Tutoring service
///
/// Holds the two ports and the shared event log. Every operation records an
/// `INFO` event when it starts and a `SUCCESS` or `ERROR` event when it ends,
/// under the context's session id.
pub struct TutorService {
    recognizer: Arc<dyn TextRecognizer>,
    generator: Arc<dyn TextGenerator>,
    events: Arc<EventLog>,
}

impl TutorService {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        generator: Arc<dyn TextGenerator>,
        events: Arc<EventLog>,
    ) -> Self {
        Self { recognizer, generator, events }
    }

    /// Recognize the page and explain it.
    ///
    /// When nothing is recognized a `WARNING` is recorded and generation is
    /// skipped; the returned analysis then has an empty explanation.
    ///
    /// # Errors
    /// Propagates the first failing call unchanged.
    pub async fn analyze_page(
        &self,
        image: &[u8],
        instruction: Option<&str>,
        ctx: &CallContext,
    ) -> ApiResult<PageAnalysis> {
        let session = ctx.session_id();
        self.events.info(format!("Page analysis started ({} bytes)", image.len()), session);

        let extracted_text = match self.recognizer.recognize(image, ctx).await {
            Ok(text) => text,
            Err(err) => return Err(self.failed("Page analysis", err, ctx)),
        };

        if extracted_text.trim().is_empty() {
            self.events.warning("No text recognized on page; skipping explanation", session);
            return Ok(PageAnalysis { extracted_text, explanation: String::new() });
        }
        debug!(chars = extracted_text.chars().count(), "Recognized page text");

        let request = GenerationRequest::explanation(extracted_text.as_str(), instruction);
        let explanation = match self.generator.generate(&request, ctx).await {
            Ok(text) => text,
            Err(err) => return Err(self.failed("Page analysis", err, ctx)),
        };

        self.events.success("Page analysis completed", session);
        Ok(PageAnalysis { extracted_text, explanation })
    }

    /// Answer `question` using `content` as the only source.
    ///
    /// # Errors
    /// `ApiError::Config` for a blank question, otherwise the generator's
    /// error.
    pub async fn ask(&self, content: &str, question: &str, ctx: &CallContext) -> ApiResult<String> {
        if question.trim().is_empty() {
            return Err(ApiError::Config("question must not be empty".into()));
        }
        self.run("Question", GenerationRequest::answer(content, question), ctx).await
    }

    /// Generate practical examples on `topic`.
    ///
    /// # Errors
    /// `ApiError::Config` for a blank topic, otherwise the generator's error.
    pub async fn examples(
        &self,
        content: &str,
        topic: &str,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        if topic.trim().is_empty() {
            return Err(ApiError::Config("topic must not be empty".into()));
        }
        self.run("Examples", GenerationRequest::examples(content, topic), ctx).await
    }

    async fn run(
        &self,
        stage: &str,
        request: GenerationRequest,
        ctx: &CallContext,
    ) -> ApiResult<String> {
        self.events.info(format!("{stage} request started"), ctx.session_id());
        match self.generator.generate(&request, ctx).await {
            Ok(text) => {
                self.events.success(format!("{stage} request completed"), ctx.session_id());
                Ok(text)
            }
            Err(err) => Err(self.failed(stage, err, ctx)),
        }
    }

    fn failed(&self, stage: &str, err: ApiError, ctx: &CallContext) -> ApiError {
        self.events.error(format!("{stage} failed: {err}"), ctx.session_id());
        err
    }
}
