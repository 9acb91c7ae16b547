//! Client error types.

use thiserror::Error;

/// Errors from manifest fetches and action POSTs.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("fetch: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Non-success status without a provider error body.
    #[error("fetch {url}: unexpected status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Non-success status with a provider `{message}` body.
    #[error("{message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied message, surfaced to the user verbatim.
        message: String,
    },

    /// A URL failed to parse or join.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
