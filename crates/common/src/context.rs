//! Per-call context: correlation id, deadline and cancellation.
//!
//! Every network-bound operation in the client layer takes a
//! [`CallContext`] and runs its awaits through [`CallContext::guard`], so a
//! slow upstream cannot pin a worker past the caller's budget.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a guarded future stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
    #[error("cancelled by caller")]
    Cancelled,
}

/// Caller-supplied scope for one logical operation.
///
/// Cloning is cheap; clones share the cancellation token and the absolute
/// deadline.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    session_id: Option<String>,
    deadline: Option<(Instant, Duration)>,
    cancellation: Option<CancellationToken>,
}

impl CallContext {
    /// Context without session, deadline or cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose events are correlated under `session_id`.
    pub fn for_session(session_id: impl Into<String>) -> Self {
        Self { session_id: Some(session_id.into()), ..Self::default() }
    }

    /// Sets a deadline `budget` from now. The deadline is absolute: every
    /// guarded step of the call shares it.
    #[must_use]
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.deadline = Some((Instant::now() + budget, budget));
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|(at, _)| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Drives `fut` to completion unless the deadline passes or the token is
    /// cancelled first. Cancellation wins ties.
    ///
    /// # Errors
    /// Returns [`Interrupted`] when `fut` was dropped before finishing.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(Interrupted::Cancelled),
            _ = expired => {
                let budget = self.deadline.map(|(_, budget)| budget).unwrap_or_default();
                Err(Interrupted::DeadlineExceeded(budget))
            }
            output = fut => Ok(output),
        }
    }
}
