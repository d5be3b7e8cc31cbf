/// Identity endpoint client
use async_trait::async_trait;
use reqwest::Method;
use studylens_common::{CredentialError, RenewalClient, RenewedToken};
use tracing::{debug, warn};

use super::types::{RenewalRequest, RenewalResponse};
use crate::http::HttpClient;
use crate::integrations::{truncate, LOGGED_BODY_LIMIT};

/// Renews bearer tokens against the identity endpoint
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http_client: HttpClient,
    url: String,
}

impl IdentityClient {
    pub fn new(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self { http_client, url: url.into() }
    }
}

#[async_trait]
impl RenewalClient for IdentityClient {
    async fn renew(&self, refresh_secret: &str) -> Result<RenewedToken, CredentialError> {
        let request = self
            .http_client
            .request(Method::POST, &self.url)
            .json(&RenewalRequest { refresh_token: refresh_secret });

        let response = self.http_client.send(request).await?;
        debug!(status = response.status, "Received identity response");

        if response.status != 200 {
            warn!(
                status = response.status,
                body = %truncate(&response.body, LOGGED_BODY_LIMIT),
                "Identity endpoint rejected renewal"
            );
            return Err(CredentialError::RenewalFailed {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: RenewalResponse = response.json().map_err(|e| {
            CredentialError::MalformedResponse(format!("Failed to parse renewal response: {e}"))
        })?;

        match parsed.iam_token {
            Some(token) if !token.is_empty() => Ok(RenewedToken::new(token, parsed.expires_at)),
            _ => Err(CredentialError::MalformedResponse("response carried no iamToken".into())),
        }
    }
}
