//! Seam between the credential store and the identity endpoint

use async_trait::async_trait;

use super::credential::RenewedToken;
use super::error::CredentialError;

/// Exchanges the long-lived refresh secret for a fresh bearer token.
///
/// Implementations must not retry on their own: a non-2xx answer is
/// reported as [`CredentialError::RenewalFailed`] with the raw body.
#[async_trait]
pub trait RenewalClient: Send + Sync {
    async fn renew(&self, refresh_secret: &str) -> Result<RenewedToken, CredentialError>;
}
