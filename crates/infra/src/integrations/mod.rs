//! External service integrations
//!
//! - [`identity`]: bearer-token renewal
//! - [`vision`]: text recognition
//! - [`gpt`]: text generation
//!
//! Both API clients send through [`authorized::AuthorizedCaller`], which owns
//! the retry-once-after-renewal policy.

pub mod authorized;
pub mod gpt;
pub mod identity;
pub mod vision;

pub use authorized::{AuthorizedCaller, MAX_ATTEMPTS};
pub use gpt::GenerationClient;
pub use identity::IdentityClient;
pub use vision::{ProbeOutcome, RecognitionClient};

/// Longest slice of a response body kept in logs and event messages.
pub(crate) const LOGGED_BODY_LIMIT: usize = 256;

/// Prefix of `text` holding at most `limit` characters.
pub(crate) fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
