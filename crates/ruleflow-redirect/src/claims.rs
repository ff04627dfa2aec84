//! Session token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names owned by the token manager. Extra claims supplied by the
/// caller may not shadow them and are dropped at issuance.
///
/// `exp` is intentionally absent: nonce-mode expiry is caller-controlled
/// and passes through the extra claims.
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "ip", "iss", "nonce", "iat"];

/// Payload of a session token.
///
/// One claim struct serves both binding modes: issuer-bound tokens carry
/// `iss` and `exp`, nonce-bound tokens carry `nonce`. Caller-supplied
/// extra claims are flattened alongside the standard fields and are the
/// only part of a validated token returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Client IP address at issuance time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Issuer URL derived from the request hostname (issuer mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Random anti-replay nonce (nonce mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Expiration time as Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at as Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Caller-supplied extra claims. These MUST NOT carry secret data:
    /// the token is signed, not encrypted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionClaims {
    /// Consume the claims, keeping only the caller-trustworthy payload:
    /// the extra claims with every standard/binding field stripped.
    #[must_use]
    pub fn into_extra(self) -> Map<String, Value> {
        self.extra
    }
}

/// Drop reserved keys from caller-supplied extra claims.
pub(crate) fn sanitize_extra(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_CLAIMS {
        extra.remove(key);
    }
    extra
}
