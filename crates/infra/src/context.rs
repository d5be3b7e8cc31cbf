//! Application context - composition root
//!
//! Builds one `HttpClient`, one `CredentialStore` and one `EventLog` and
//! hands the same instances to both API clients and the tutor service.

use std::sync::Arc;

use studylens_common::{ApiError, ApiResult, CredentialStore, EventLog};
use studylens_core::TutorService;
use studylens_domain::AppConfig;
use tracing::info;

use crate::http::HttpClient;
use crate::integrations::{GenerationClient, IdentityClient, RecognitionClient};

/// Application context - holds the shared services
pub struct AppContext {
    pub config: AppConfig,
    pub credentials: Arc<CredentialStore>,
    pub events: Arc<EventLog>,
    pub recognition: Arc<RecognitionClient>,
    pub generation: Arc<GenerationClient>,
    pub tutor: TutorService,
}

impl AppContext {
    /// Wire every service from `config`.
    ///
    /// # Errors
    /// [`ApiError::Config`] when validation fails or the HTTP client cannot
    /// be built.
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        config.validate().map_err(|e| ApiError::Config(e.to_string()))?;

        let http_client = HttpClient::builder()
            .timeout(config.runtime.request_timeout())
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let renewal = Arc::new(IdentityClient::new(http_client.clone(), &config.identity.url));
        let credentials = Arc::new(CredentialStore::new(
            renewal,
            config.identity.refresh_token.clone(),
            config.identity.renewal_margin(),
        ));
        let events = Arc::new(EventLog::new(config.runtime.event_log_capacity));

        let recognition = Arc::new(RecognitionClient::new(
            http_client.clone(),
            Arc::clone(&credentials),
            Arc::clone(&events),
            &config,
        ));
        let generation = Arc::new(GenerationClient::new(
            http_client,
            Arc::clone(&credentials),
            Arc::clone(&events),
            &config,
        ));
        let tutor =
            TutorService::new(recognition.clone(), generation.clone(), Arc::clone(&events));

        info!(
            folder_id = %config.folder_id,
            has_refresh_secret = config.identity.refresh_token.is_some(),
            "Application context initialised"
        );

        Ok(Self { config, credentials, events, recognition, generation, tutor })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("folder_id", &self.config.folder_id)
            .field("credentials", &self.credentials)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
