use thiserror::Error;

/// Failures of the credential store and its renewal client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No refresh secret is configured; renewal is impossible.
    #[error("credential unavailable: no refresh secret configured")]
    Unavailable,

    /// The identity endpoint answered with a non-success status.
    #[error("credential renewal failed with status {status}: {body}")]
    RenewalFailed { status: u16, body: String },

    /// The identity endpoint could not be reached.
    #[error("transport error during credential renewal: {0}")]
    Transport(String),

    /// The identity endpoint answered 2xx with an unusable body.
    #[error("malformed renewal response: {0}")]
    MalformedResponse(String),
}
