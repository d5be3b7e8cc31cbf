//! Credential store with margin-based renewal
//!
//! Owns the current bearer credential:
//! - Serves the cached credential while `now + margin < expires_at`
//! - Renews through a [`RenewalClient`] when empty, stale or forced
//! - Swaps token and expiry together, never one without the other
//! - Leaves the previous credential untouched when renewal fails

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::credential::Credential;
use super::error::CredentialError;
use super::traits::RenewalClient;
use crate::time::{Clock, SystemClock};

/// Lifetime assumed when the identity endpoint omits `expiresAt`.
pub const DEFAULT_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(11 * 60 * 60);

/// Observable lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No renewal has succeeded yet.
    Empty,
    Fresh,
    /// A credential is held but it is inside the renewal margin.
    Stale,
}

/// Single source of truth for the bearer credential.
///
/// Construct once at startup and share behind `Arc`. Renewals are
/// single-flight: concurrent callers that find the credential stale queue on
/// one renewal and reuse its result.
pub struct CredentialStore {
    renewal: Arc<dyn RenewalClient>,
    refresh_secret: Option<String>,
    margin: Duration,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<Credential>>,
    renewal_lock: Mutex<()>,
    renewals: AtomicU64,
}

impl CredentialStore {
    /// Create an empty store.
    ///
    /// # Arguments
    /// * `renewal` - client for the identity endpoint
    /// * `refresh_secret` - long-lived secret; `None` makes every renewal
    ///   fail with [`CredentialError::Unavailable`]
    /// * `margin` - renew this long before the reported expiry
    #[must_use]
    pub fn new(
        renewal: Arc<dyn RenewalClient>,
        refresh_secret: Option<String>,
        margin: Duration,
    ) -> Self {
        Self {
            renewal,
            refresh_secret: refresh_secret.filter(|secret| !secret.trim().is_empty()),
            margin,
            clock: Arc::new(SystemClock),
            current: RwLock::new(None),
            renewal_lock: Mutex::new(()),
            renewals: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Returns a usable credential, renewing first when `force_refresh` is
    /// set or the cached one is missing or stale.
    ///
    /// # Errors
    /// - [`CredentialError::Unavailable`] if no refresh secret is configured
    /// - Any error from the renewal client; the cached credential is kept
    pub async fn get_token(&self, force_refresh: bool) -> Result<Credential, CredentialError> {
        if !force_refresh {
            if let Some(credential) = self.fresh_snapshot().await {
                debug!(token = %credential.redacted(), "Serving cached credential");
                return Ok(credential);
            }
        }
        self.renew_if_needed(force_refresh).await
    }

    /// Unconditionally renews the credential.
    ///
    /// # Errors
    /// Same as [`get_token`](Self::get_token).
    pub async fn renew(&self) -> Result<Credential, CredentialError> {
        self.renew_if_needed(true).await
    }

    /// Current credential without any renewal.
    pub async fn snapshot(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    pub async fn state(&self) -> CredentialState {
        match self.current.read().await.as_ref() {
            None => CredentialState::Empty,
            Some(credential) if self.is_fresh(credential) => CredentialState::Fresh,
            Some(_) => CredentialState::Stale,
        }
    }

    pub fn is_fresh(&self, credential: &Credential) -> bool {
        credential.is_fresh_at(self.clock.now(), self.margin)
    }

    /// Number of successful renewals since construction.
    pub fn renewal_count(&self) -> u64 {
        self.renewals.load(Ordering::SeqCst)
    }

    async fn fresh_snapshot(&self) -> Option<Credential> {
        let current = self.current.read().await;
        current.as_ref().filter(|credential| self.is_fresh(credential)).cloned()
    }

    async fn renew_if_needed(&self, forced: bool) -> Result<Credential, CredentialError> {
        let secret = self.refresh_secret.as_deref().ok_or_else(|| {
            warn!("Credential requested but no refresh secret is configured");
            CredentialError::Unavailable
        })?;

        let seen = self.renewals.load(Ordering::SeqCst);
        let _flight = self.renewal_lock.lock().await;

        // Another caller may have renewed while we waited.
        let completed_meanwhile = self.renewals.load(Ordering::SeqCst) != seen;
        if let Some(credential) = self.snapshot().await {
            if (forced && completed_meanwhile) || (!forced && self.is_fresh(&credential)) {
                debug!("Reusing credential renewed by a concurrent caller");
                return Ok(credential);
            }
        }

        debug!(forced, "Renewing credential");
        let renewed = match self.renewal.renew(secret).await {
            Ok(renewed) => renewed,
            Err(err) => {
                warn!(error = %err, "Credential renewal failed; keeping previous credential");
                return Err(err);
            }
        };
        if renewed.token.is_empty() {
            warn!("Identity endpoint returned an empty token");
            return Err(CredentialError::MalformedResponse("empty token".into()));
        }

        let now = self.clock.now();
        let expires_at = match renewed.expires_at {
            Some(at) => at,
            None => now
                + chrono::Duration::from_std(DEFAULT_CREDENTIAL_LIFETIME)
                    .unwrap_or_else(|_| chrono::Duration::hours(11)),
        };
        let credential = Credential::new(renewed.token, Some(expires_at));

        if !credential.is_fresh_at(now, self.margin) {
            // Clock skew or a very short lifetime; stored and used anyway.
            warn!(
                expires_at = %expires_at,
                margin_secs = self.margin.as_secs(),
                "Renewed credential is already inside the renewal margin"
            );
        }

        // Counted under the write guard so any reader of the new token
        // also observes the incremented count.
        let mut current = self.current.write().await;
        *current = Some(credential.clone());
        self.renewals.fetch_add(1, Ordering::SeqCst);
        drop(current);

        info!(token = %credential.redacted(), expires_at = %expires_at, "Credential renewed");
        Ok(credential)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_refresh_secret", &self.refresh_secret.is_some())
            .field("margin", &self.margin)
            .field("renewals", &self.renewal_count())
            .finish_non_exhaustive()
    }
}
