/// Wire types for the completion endpoint
use serde::{Deserialize, Serialize};
use studylens_domain::GenerationRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionRequest<'a> {
    pub model_uri: &'a str,
    pub completion_options: CompletionOptions,
    pub messages: Vec<MessageBody<'a>>,
}

impl<'a> CompletionRequest<'a> {
    /// System instruction from the kind's profile, then the rendered user prompt.
    pub fn build(model_uri: &'a str, request: &GenerationRequest, user_text: &'a str) -> Self {
        let profile = request.profile();
        Self {
            model_uri,
            completion_options: CompletionOptions {
                stream: false,
                temperature: profile.temperature,
                max_tokens: profile.max_tokens,
            },
            messages: vec![
                MessageBody { role: "system", text: profile.system_instruction },
                MessageBody { role: "user", text: user_text },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionOptions {
    pub stream: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageBody<'a> {
    pub role: &'a str,
    pub text: &'a str,
}

/// Response of the completion endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub result: Option<CompletionResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub message: Option<AlternativeMessage>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl CompletionResponse {
    /// Text of the first alternative.
    ///
    /// # Errors
    /// Describes the first missing step of `result.alternatives[0].message.text`.
    pub fn into_text(self) -> Result<String, String> {
        let result = self.result.ok_or("response has no result")?;
        let alternative =
            result.alternatives.into_iter().next().ok_or("result has no alternatives")?;
        alternative
            .message
            .and_then(|message| message.text)
            .ok_or_else(|| "first alternative has no message text".to_string())
    }
}
