//! Configuration structures
//!
//! Deserialized from JSON/TOML files or assembled from environment variables
//! by the infra config loader. Every section except `folder_id` has defaults
//! pointing at the reference cloud endpoints.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EVENT_LOG_CAPACITY, DEFAULT_GPT_MODEL_NAME, DEFAULT_GPT_URL, DEFAULT_IDENTITY_URL,
    DEFAULT_LANGUAGE_CODES, DEFAULT_RENEWAL_MARGIN_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_VISION_URL, RECOGNITION_MODEL,
};
use crate::errors::{Result, StudyLensError};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tenant/folder identifier sent with every API call
    pub folder_id: String,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Configuration with defaults for everything except the folder id.
    pub fn with_folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            identity: IdentityConfig::default(),
            vision: VisionConfig::default(),
            generation: GenerationConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns `StudyLensError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.folder_id.trim().is_empty() {
            return Err(StudyLensError::Config("folder_id must not be empty".into()));
        }
        validate_url("identity.url", &self.identity.url)?;
        validate_url("vision.url", &self.vision.url)?;
        validate_url("generation.url", &self.generation.url)?;
        if self.vision.language_codes.is_empty() {
            return Err(StudyLensError::Config(
                "vision.language_codes must list at least one language".into(),
            ));
        }
        if self.runtime.request_timeout_secs == 0 {
            return Err(StudyLensError::Config("runtime.request_timeout_secs must be > 0".into()));
        }
        if self.runtime.event_log_capacity == 0 {
            return Err(StudyLensError::Config("runtime.event_log_capacity must be > 0".into()));
        }
        Ok(())
    }

    /// Model URI for generation, derived from the folder id unless overridden.
    pub fn model_uri(&self) -> String {
        self.generation
            .model_uri
            .clone()
            .unwrap_or_else(|| format!("gpt://{}/{}", self.folder_id, DEFAULT_GPT_MODEL_NAME))
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| StudyLensError::Config(format!("{field} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(StudyLensError::Config(format!("{field} has unsupported scheme '{other}'"))),
    }
}

/// Identity endpoint used to renew the short-lived bearer credential
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_identity_url")]
    pub url: String,
    /// Long-lived refresh secret; absence surfaces as `CredentialUnavailable`
    /// on first use rather than at startup.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_renewal_margin_secs")]
    pub renewal_margin_secs: u64,
}

impl IdentityConfig {
    pub fn renewal_margin(&self) -> Duration {
        Duration::from_secs(self.renewal_margin_secs)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: default_identity_url(),
            refresh_token: None,
            renewal_margin_secs: default_renewal_margin_secs(),
        }
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("url", &self.url)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("renewal_margin_secs", &self.renewal_margin_secs)
            .finish()
    }
}

/// Text recognition endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_vision_url")]
    pub url: String,
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,
    #[serde(default = "default_recognition_model")]
    pub model: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            url: default_vision_url(),
            language_codes: default_language_codes(),
            model: default_recognition_model(),
        }
    }
}

/// Text generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_gpt_url")]
    pub url: String,
    /// Full model URI; defaults to `gpt://<folder_id>/yandexgpt-lite`
    #[serde(default)]
    pub model_uri: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { url: default_gpt_url(), model_uri: None }
    }
}

/// Process-wide runtime knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

impl RuntimeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}

fn default_vision_url() -> String {
    DEFAULT_VISION_URL.to_string()
}

fn default_gpt_url() -> String {
    DEFAULT_GPT_URL.to_string()
}

fn default_language_codes() -> Vec<String> {
    DEFAULT_LANGUAGE_CODES.iter().map(|code| (*code).to_string()).collect()
}

fn default_recognition_model() -> String {
    RECOGNITION_MODEL.to_string()
}

fn default_renewal_margin_secs() -> u64 {
    DEFAULT_RENEWAL_MARGIN_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_event_log_capacity() -> usize {
    DEFAULT_EVENT_LOG_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "folder_id": "b1gfolder" }"#).unwrap();

        assert_eq!(config.identity.url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.identity.refresh_token, None);
        assert_eq!(config.identity.renewal_margin(), Duration::from_secs(300));
        assert_eq!(config.vision.language_codes, vec!["ru".to_string(), "en".to_string()]);
        assert_eq!(config.vision.model, "page");
        assert_eq!(config.runtime.event_log_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn model_uri_defaults_to_folder_scoped_lite_model() {
        let config = AppConfig::with_folder("b1gfolder");
        assert_eq!(config.model_uri(), "gpt://b1gfolder/yandexgpt-lite");

        let mut custom = config.clone();
        custom.generation.model_uri = Some("gpt://other/yandexgpt/latest".into());
        assert_eq!(custom.model_uri(), "gpt://other/yandexgpt/latest");
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
folder_id = "b1gfolder"

[identity]
refresh_token = "secret"
renewal_margin_secs = 60

[runtime]
event_log_capacity = 10
"#,
        )
        .unwrap();

        assert_eq!(config.identity.refresh_token.as_deref(), Some("secret"));
        assert_eq!(config.identity.renewal_margin_secs, 60);
        assert_eq!(config.runtime.event_log_capacity, 10);
        assert_eq!(config.runtime.request_timeout_secs, 30);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::with_folder("  ");
        assert!(matches!(config.validate(), Err(StudyLensError::Config(_))));

        config.folder_id = "b1gfolder".into();
        config.vision.url = "ftp://vision.example".into();
        assert!(config.validate().is_err());

        config.vision.url = DEFAULT_VISION_URL.into();
        config.runtime.event_log_capacity = 0;
        assert!(config.validate().is_err());

        config.runtime.event_log_capacity = 5;
        config.runtime.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_refresh_secret() {
        let mut identity = IdentityConfig::default();
        identity.refresh_token = Some("super-secret".into());

        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
