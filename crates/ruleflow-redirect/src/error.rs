//! Error types for redirect and session-token operations.
//!
//! Provides explicit error variants for all failure modes.

use thiserror::Error;

/// Redirect and session-token error types.
///
/// Validation failures (`InvalidNonce`, `InvalidUser`, `InvalidIssuer`,
/// `InvalidSubject`, ...) are the sole replay/tamper defense of the
/// protocol and must never be downgraded by callers.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Policy forbids a redirect, or the redirect target is empty.
    #[error("Cannot redirect")]
    RedirectNotAllowed,

    /// No signing secret is configured.
    #[error("No session token secret is configured")]
    MissingSecret,

    /// The inbound request carries no session token parameter.
    #[error("No session token found in the request")]
    MissingToken,

    /// Token signature is invalid.
    #[error("Invalid token signature")]
    BadSignature,

    /// Token has expired (exp claim is in the past).
    #[error("Token has expired")]
    TokenExpired,

    /// Token issuer does not match the expected issuer URL.
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Token subject does not match the expected user.
    #[error("Invalid subject")]
    InvalidSubject,

    /// The verified payload carries no expiry claim at all.
    #[error("Token has no expiry claim")]
    MissingExpiry,

    /// Token nonce does not match the nonce bound to the user record.
    #[error("Invalid session nonce")]
    InvalidNonce,

    /// Token subject does not match the user record (nonce mode).
    #[error("Invalid user")]
    InvalidUser,

    /// Required claim is missing from the token.
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// Token format is malformed or invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Configuration value could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Check if this error indicates an expired token.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, SessionError::TokenExpired)
    }

    /// Check if this error was produced by token validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            SessionError::MissingToken
                | SessionError::BadSignature
                | SessionError::TokenExpired
                | SessionError::InvalidIssuer
                | SessionError::InvalidSubject
                | SessionError::MissingExpiry
                | SessionError::InvalidNonce
                | SessionError::InvalidUser
                | SessionError::MissingClaim(_)
                | SessionError::InvalidToken(_)
        )
    }

    /// Check if this error is a configuration problem rather than a
    /// protocol failure.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::MissingSecret | SessionError::InvalidConfig(_)
        )
    }
}
