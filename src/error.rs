//! Error types for the update check.

/// Failure modes of a single version check.
///
/// None of these ever reach the caller of
/// [`UpdateChecker::check_update`](crate::update::UpdateChecker::check_update);
/// the background task logs them and leaves the shared state unready.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The request or HTTP client could not be built.
    #[error("failed to create a request: {0}")]
    Request(String),

    /// The request failed in transit (DNS, connect, TLS, body read).
    #[error("failed to get the latest version: {0}")]
    Transport(String),

    /// The endpoint answered with something other than 200 OK.
    #[error("failed to get the latest version: HTTP {0}")]
    Status(u16),

    /// The response body was not a valid update payload.
    #[error("failed to decode the response: {0}")]
    Decode(String),

    /// The request did not finish within the configured timeout.
    #[error("update check timed out after {0}s")]
    Timeout(u64),

    /// The caller cancelled the check.
    #[error("update check cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for UpdateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Request(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, UpdateError>;
