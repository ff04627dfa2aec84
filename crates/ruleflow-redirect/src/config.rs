//! Session token configuration.
//!
//! Read-only after construction; safe to share across any number of
//! concurrent attempts.

use crate::error::SessionError;
use std::env;
use std::time::Duration;

/// Environment variable holding the token signing secret.
pub const SESSION_TOKEN_SECRET_VAR: &str = "SESSION_TOKEN_SECRET";

/// Environment variable holding the issuer-mode token lifetime.
pub const SESSION_TOKEN_EXPIRES_IN_VAR: &str = "SESSION_TOKEN_EXPIRES_IN";

/// Default issuer-mode token lifetime: 3 days.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Anti-replay binding strategy for session tokens.
///
/// The two variants are alternative designs for the same requirement and
/// are never combined in one issuance mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenBinding {
    /// Bind the token to an issuer URL derived from the request hostname
    /// and always stamp an expiry.
    #[default]
    Issuer,

    /// Bind the token to a fresh 256-bit random nonce stored on the user
    /// record. Expiry is caller-controlled and not defaulted.
    Nonce,
}

/// Configuration for issuing and validating session tokens.
///
/// The secret may be absent at construction time; it is required when a
/// token is actually signed or verified.
#[derive(Clone)]
pub struct SessionTokenConfig {
    secret: Option<String>,
    expires_in: Duration,
    binding: TokenBinding,
}

impl std::fmt::Debug for SessionTokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenConfig")
            .field(
                "secret",
                &self.secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("binding", &self.binding)
            .finish()
    }
}

impl SessionTokenConfig {
    /// Create a configuration with the given signing secret and defaults
    /// for everything else (issuer binding, 3-day lifetime).
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            expires_in: DEFAULT_EXPIRES_IN,
            binding: TokenBinding::default(),
        }
    }

    /// Create a configuration with no signing secret. Issuing or
    /// validating a token with it fails with
    /// [`SessionError::MissingSecret`].
    #[must_use]
    pub fn without_secret() -> Self {
        Self {
            secret: None,
            expires_in: DEFAULT_EXPIRES_IN,
            binding: TokenBinding::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `SESSION_TOKEN_SECRET` (may be absent; required only once a
    /// token is signed or verified) and `SESSION_TOKEN_EXPIRES_IN`
    /// (optional; duration string such as `"3d"`/`"1h"`, or bare seconds).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if the lifetime value does
    /// not parse.
    pub fn from_env() -> Result<Self, SessionError> {
        let secret = env::var(SESSION_TOKEN_SECRET_VAR).ok();
        let expires_in = match env::var(SESSION_TOKEN_EXPIRES_IN_VAR) {
            Ok(raw) => parse_expires_in(&raw)?,
            Err(_) => DEFAULT_EXPIRES_IN,
        };

        Ok(Self {
            secret,
            expires_in,
            binding: TokenBinding::default(),
        })
    }

    /// Set the issuer-mode token lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Set the anti-replay binding strategy.
    #[must_use]
    pub fn with_binding(mut self, binding: TokenBinding) -> Self {
        self.binding = binding;
        self
    }

    /// The signing secret, if configured.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// The issuer-mode token lifetime.
    #[must_use]
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// The configured binding strategy.
    #[must_use]
    pub fn binding(&self) -> TokenBinding {
        self.binding
    }
}

/// Parse a token lifetime value: bare integers are seconds, everything
/// else goes through [`humantime`] (`"3d"`, `"1h"`, `"90m"`, ...).
pub fn parse_expires_in(raw: &str) -> Result<Duration, SessionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SessionError::InvalidConfig(format!(
            "{SESSION_TOKEN_EXPIRES_IN_VAR} is empty"
        )));
    }

    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    humantime::parse_duration(raw).map_err(|e| {
        SessionError::InvalidConfig(format!(
            "{SESSION_TOKEN_EXPIRES_IN_VAR} value {raw:?} is not a duration: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionTokenConfig::new("secret");
        assert_eq!(config.secret(), Some("secret"));
        assert_eq!(config.expires_in(), Duration::from_secs(259_200));
        assert_eq!(config.binding(), TokenBinding::Issuer);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SessionTokenConfig::new("secret")
            .with_expires_in(Duration::from_secs(3600))
            .with_binding(TokenBinding::Nonce);
        assert_eq!(config.expires_in(), Duration::from_secs(3600));
        assert_eq!(config.binding(), TokenBinding::Nonce);
    }

    #[test]
    fn test_parse_expires_in_days() {
        assert_eq!(
            parse_expires_in("3d").unwrap(),
            Duration::from_secs(3 * 24 * 60 * 60)
        );
    }

    #[test]
    fn test_parse_expires_in_hours() {
        assert_eq!(parse_expires_in("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_expires_in_bare_seconds() {
        assert_eq!(
            parse_expires_in("3600").unwrap(),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_parse_expires_in_rejects_garbage() {
        let err = parse_expires_in("soon").unwrap_err();
        assert!(err.is_config_error());

        assert!(parse_expires_in("").is_err());
        assert!(parse_expires_in("  ").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = SessionTokenConfig::new("super-secret-value");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_without_secret() {
        let config = SessionTokenConfig::without_secret();
        assert_eq!(config.secret(), None);
    }
}
