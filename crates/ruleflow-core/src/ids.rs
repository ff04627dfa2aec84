//! Strongly typed identifiers.
//!
//! Provider user identifiers are opaque, provider-scoped strings
//! (`"auth0|5f7c8ec7"`-shaped). The newtype prevents accidentally passing an
//! arbitrary string where a user identifier is expected.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier of a user at the identity provider.
///
/// # Example
///
/// ```
/// use ruleflow_core::UserId;
///
/// let id = UserId::from("auth0|5f7c8ec7");
/// assert_eq!(id.as_str(), "auth0|5f7c8ec7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    /// An empty identifier, used when the host omits the field.
    fn default() -> Self {
        Self(String::new())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let id = UserId::from("auth0|abc123");
        assert_eq!(id.to_string(), "auth0|abc123");
        assert_eq!(UserId::new(id.to_string()), id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::from("u1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u1\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
