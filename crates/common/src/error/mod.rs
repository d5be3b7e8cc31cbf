//! Error taxonomy for the remote API clients
//!
//! | Variant | Source | Retried |
//! |---------|--------|---------|
//! | `CredentialUnavailable` | no refresh secret configured | never |
//! | `RenewalFailed` | identity endpoint rejected renewal | never |
//! | `Transport` | network failure | never |
//! | `Timeout` / `Cancelled` | caller's [`CallContext`](crate::CallContext) | never |
//! | `MalformedResponse` | 2xx with an unexpected shape | never |
//! | `Api` | non-2xx, or 401 after the single forced renewal | never |
//! | `Config` | invalid input detected before any request | never |
//!
//! A first 401 is not an error: it is handled inside the client by one
//! forced renewal and one resend.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::auth::CredentialError;
use crate::context::Interrupted;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("credential unavailable: no refresh secret configured")]
    CredentialUnavailable,

    #[error("credential renewal failed with status {status}: {body}")]
    RenewalFailed { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid request: {0}")]
    Config(String),
}

/// Field-less discriminant of [`ApiError`], for matching and event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    CredentialUnavailable,
    RenewalFailed,
    Transport,
    Timeout,
    Cancelled,
    MalformedResponse,
    Api,
    Config,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CredentialUnavailable => "credential_unavailable",
            Self::RenewalFailed => "renewal_failed",
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::MalformedResponse => "malformed_response",
            Self::Api => "api",
            Self::Config => "config",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::CredentialUnavailable => ApiErrorKind::CredentialUnavailable,
            Self::RenewalFailed { .. } => ApiErrorKind::RenewalFailed,
            Self::Transport(_) => ApiErrorKind::Transport,
            Self::Timeout(_) => ApiErrorKind::Timeout,
            Self::Cancelled => ApiErrorKind::Cancelled,
            Self::MalformedResponse(_) => ApiErrorKind::MalformedResponse,
            Self::Api { .. } => ApiErrorKind::Api,
            Self::Config(_) => ApiErrorKind::Config,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RenewalFailed { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::RenewalFailed { body, .. } | Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether a caller-level retry could plausibly succeed. The client layer
    /// itself never retries on any of these.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Unavailable => Self::CredentialUnavailable,
            CredentialError::RenewalFailed { status, body } => Self::RenewalFailed { status, body },
            CredentialError::Transport(message) => Self::Transport(message),
            CredentialError::MalformedResponse(message) => Self::MalformedResponse(message),
        }
    }
}

impl From<Interrupted> for ApiError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::DeadlineExceeded(budget) => Self::Timeout(budget),
            Interrupted::Cancelled => Self::Cancelled,
        }
    }
}
