use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use studylens_common::{ApiError, CredentialError};
use thiserror::Error;
use tracing::debug;

/// Transport-level failure: no HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(after) => ApiError::Timeout(after),
            HttpError::Transport(message) | HttpError::Build(message) => {
                ApiError::Transport(message)
            }
        }
    }
}

impl From<HttpError> for CredentialError {
    fn from(err: HttpError) -> Self {
        CredentialError::Transport(err.to_string())
    }
}

/// Fully-read response: status plus raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP client with a per-request timeout.
///
/// Sends each request exactly once. Retrying is a policy decision of the
/// calling client, never of the transport.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns [`HttpError::Build`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request and read the whole body.
    ///
    /// Any HTTP status is a successful send; only failures to obtain a
    /// status are errors.
    ///
    /// # Errors
    /// [`HttpError::Timeout`] or [`HttpError::Transport`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<HttpResponse, HttpError> {
        let request = builder.build().map_err(|err| HttpError::Transport(err.to_string()))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            self.classify(err)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| self.classify(err))?;
        debug!(%method, %url, status, bytes = body.len(), "received HTTP response");

        Ok(HttpResponse { status, body })
    }

    fn classify(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.timeout)
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: Some(concat!("studylens/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns [`HttpError::Build`] if reqwest rejects the configuration.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| HttpError::Build(err.to_string()))?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}
