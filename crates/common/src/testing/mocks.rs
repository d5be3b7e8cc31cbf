//! Scripted renewal client

#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::auth::{CredentialError, RenewalClient, RenewedToken};

type Scripted = Result<RenewedToken, CredentialError>;

/// Renewal client that replays queued outcomes.
///
/// Once the queue is drained every call succeeds with `token-<n>` (1-based
/// call number) and no reported expiry.
#[derive(Debug, Default)]
pub struct MockRenewalClient {
    script: Mutex<VecDeque<Scripted>>,
    secrets: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockRenewalClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each renewal sleeps for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_ok(&self, token: impl Into<String>, expires_at: Option<DateTime<Utc>>) {
        self.script.lock().push_back(Ok(RenewedToken::new(token, expires_at)));
    }

    pub fn push_err(&self, error: CredentialError) {
        self.script.lock().push_back(Err(error));
    }

    /// Number of renewals performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh secrets received, in call order.
    pub fn secrets(&self) -> Vec<String> {
        self.secrets.lock().clone()
    }
}

#[async_trait]
impl RenewalClient for MockRenewalClient {
    async fn renew(&self, refresh_secret: &str) -> Result<RenewedToken, CredentialError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.secrets.lock().push(refresh_secret.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(RenewedToken::new(format!("token-{call}"), None)))
    }
}
