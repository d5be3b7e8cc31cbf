//! Authenticated request execution with one renewal-driven retry
//!
//! ```text
//! get_token(false) ─► attempt 1 ─┬─ 2xx ──────────────────────────► Ok
//!                                ├─ other ────────────────────────► Err(Api)
//!                                └─ 401 ─► get_token(true) ─► attempt 2
//!                                                               ├─ 2xx ─► Ok
//!                                                               └─ any ─► Err(Api)
//! ```
//!
//! Transport failures, timeouts and cancellation end the call at whatever
//! stage they happen; they never trigger renewal.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::Serialize;
use studylens_common::{ApiError, ApiResult, CallContext, Credential, CredentialStore, EventLog};
use studylens_domain::constants::FOLDER_ID_HEADER;
use tracing::{debug, info, warn};

use super::{truncate, LOGGED_BODY_LIMIT};
use crate::http::{HttpClient, HttpResponse};

/// Upper bound on sends per call: the original request plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Typed result of a single send.
#[derive(Debug)]
enum AttemptOutcome {
    Success(HttpResponse),
    AuthRejected(HttpResponse),
    Failed(HttpResponse),
}

impl From<HttpResponse> for AttemptOutcome {
    fn from(response: HttpResponse) -> Self {
        if response.is_success() {
            Self::Success(response)
        } else if response.status == 401 {
            Self::AuthRejected(response)
        } else {
            Self::Failed(response)
        }
    }
}

/// Sends JSON requests with the bearer credential and the folder header.
///
/// One caller per remote service; `service` names it in events.
#[derive(Clone)]
pub struct AuthorizedCaller {
    http_client: HttpClient,
    credentials: Arc<CredentialStore>,
    events: Arc<EventLog>,
    folder_id: String,
    service: &'static str,
}

impl AuthorizedCaller {
    pub fn new(
        service: &'static str,
        http_client: HttpClient,
        credentials: Arc<CredentialStore>,
        events: Arc<EventLog>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self { http_client, credentials, events, folder_id: folder_id.into(), service }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// POST `body` to `url`; on a first 401, force one renewal and resend.
    ///
    /// # Errors
    /// - Credential errors from the store (before any send)
    /// - [`ApiError::Transport`], [`ApiError::Timeout`], [`ApiError::Cancelled`]
    /// - [`ApiError::Api`] for a non-2xx answer, including a 401 on the retry
    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        ctx: &CallContext,
    ) -> ApiResult<HttpResponse>
    where
        B: Serialize + Sync + ?Sized,
    {
        let session = ctx.session_id();
        let mut credential = self.credential(false, ctx).await?;
        let mut attempt = 1;

        loop {
            debug!(service = self.service, attempt, "Sending authorized request");
            let response = self.send(url, body, &credential, ctx).await?;

            match AttemptOutcome::from(response) {
                AttemptOutcome::Success(response) => {
                    self.events.info(
                        format!("{} request accepted (attempt {attempt})", self.service),
                        session,
                    );
                    return Ok(response);
                }
                AttemptOutcome::AuthRejected(_) if attempt < MAX_ATTEMPTS => {
                    self.events.warning(
                        format!(
                            "{} rejected the credential (401); renewing and retrying once",
                            self.service
                        ),
                        session,
                    );
                    credential = self.credential(true, ctx).await?;
                    if !self.credentials.is_fresh(&credential) {
                        self.events.warning(
                            "Renewed credential is already inside the renewal margin",
                            session,
                        );
                    }
                    attempt += 1;
                }
                AttemptOutcome::AuthRejected(response) | AttemptOutcome::Failed(response) => {
                    return Err(self.rejected(response, attempt, session));
                }
            }
        }
    }

    /// Single send with the current credential and no status handling.
    ///
    /// # Errors
    /// Credential and transport errors only; every HTTP status is `Ok`.
    pub async fn post_once<B>(
        &self,
        url: &str,
        body: &B,
        ctx: &CallContext,
    ) -> ApiResult<HttpResponse>
    where
        B: Serialize + Sync + ?Sized,
    {
        let credential = self.credential(false, ctx).await?;
        self.send(url, body, &credential, ctx).await
    }

    async fn credential(&self, force_refresh: bool, ctx: &CallContext) -> ApiResult<Credential> {
        let session = ctx.session_id();
        let outcome = match ctx.guard(self.credentials.get_token(force_refresh)).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(interrupted) => Err(ApiError::from(interrupted)),
        };

        match outcome {
            Ok(credential) => {
                if force_refresh {
                    info!(service = self.service, "Credential renewed after rejection");
                    self.events.info("Credential renewed", session);
                }
                Ok(credential)
            }
            Err(err) => {
                self.events.error(
                    format!("{}: could not obtain credential: {err}", self.service),
                    session,
                );
                Err(err)
            }
        }
    }

    async fn send<B>(
        &self,
        url: &str,
        body: &B,
        credential: &Credential,
        ctx: &CallContext,
    ) -> ApiResult<HttpResponse>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self
            .http_client
            .request(Method::POST, url)
            .header(AUTHORIZATION, credential.bearer())
            .header(FOLDER_ID_HEADER, &self.folder_id)
            .json(body);

        let outcome = match ctx.guard(self.http_client.send(request)).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(interrupted) => Err(ApiError::from(interrupted)),
        };

        outcome.map_err(|err| {
            self.events.error(format!("{} request failed: {err}", self.service), ctx.session_id());
            err
        })
    }

    fn rejected(&self, response: HttpResponse, attempt: u32, session: Option<&str>) -> ApiError {
        let snippet = truncate(&response.body, LOGGED_BODY_LIMIT);
        warn!(
            service = self.service,
            status = response.status,
            attempt,
            body = %snippet,
            "Request rejected"
        );
        self.events.error(
            format!("{} returned {}: {snippet}", self.service, response.status),
            session,
        );
        ApiError::Api { status: response.status, body: response.body }
    }
}

impl std::fmt::Debug for AuthorizedCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedCaller")
            .field("service", &self.service)
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}
