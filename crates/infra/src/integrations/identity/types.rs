//! Wire types for the identity endpoint
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenewalRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenewalResponse {
    #[serde(default)]
    pub iam_token: Option<String>,
    /// RFC 3339, `Z`-suffixed UTC.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}
