//! Credential value types

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived bearer credential together with its expiry instant.
///
/// The pair is only ever replaced as a whole, so a reader never sees a token
/// matched with another token's expiry. An absent `expires_at` is treated as
/// stale.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token: token.into(), expires_at }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// `true` when `now + margin` is strictly before the expiry.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        let Ok(margin) = chrono::Duration::from_std(margin) else {
            return false;
        };
        now.checked_add_signed(margin).is_some_and(|threshold| threshold < expires_at)
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// First few characters of the token, for logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.token.chars().take(6).collect();
        format!("{prefix}…")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.redacted())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// What the identity endpoint handed back. A missing expiry is filled in by
/// the store with its default lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct RenewedToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl RenewedToken {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token: token.into(), expires_at }
    }
}

impl fmt::Debug for RenewedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenewedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
