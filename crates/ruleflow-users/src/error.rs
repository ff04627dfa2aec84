//! Error types for user API operations.

use thiserror::Error;

/// Result alias for user API operations.
pub type UserApiResult<T> = Result<T, UserApiError>;

/// User API error types.
#[derive(Debug, Error)]
pub enum UserApiError {
    /// Client could not be constructed from the given configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The API rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The addressed user does not exist.
    #[error("User not found: {0}")]
    NotFound(String),

    /// The API asked us to slow down.
    #[error("Rate limited by the user API")]
    RateLimited {
        /// Seconds to wait, from the `Retry-After` header if present.
        retry_after_secs: Option<u64>,
    },

    /// Any other non-success response.
    #[error("User API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The bounded retry budget was exhausted.
    #[error("{message}")]
    MaxRetriesExceeded { attempts: u32, message: String },
}

impl UserApiError {
    /// Whether the error is transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UserApiError::RateLimited { .. } | UserApiError::Network(_)
        )
    }

    /// Whether the error is a server-side (5xx) failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, UserApiError::Api { status, .. } if *status >= 500)
    }
}
