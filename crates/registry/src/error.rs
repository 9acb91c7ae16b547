//! Registry error types.

use thiserror::Error;

/// Errors from a registry refresh attempt.
///
/// Refresh fails soft: the background loop logs these and keeps the
/// previous tables; they surface only to callers invoking
/// [`crate::TrustRegistry::refresh`] directly.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The document fetch failed at the transport level.
    #[error("registry fetch: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("registry fetch: unexpected status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}
