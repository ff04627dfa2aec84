//! User API HTTP client (reqwest-based).
//!
//! Talks to the identity-management REST API with the per-attempt
//! credentials handed in by the host. Every mutation is an idempotent
//! PATCH and runs under a bounded retry budget.

use crate::error::{UserApiError, UserApiResult};
use crate::retry::RetryPolicy;
use reqwest::{Client, StatusCode};
use ruleflow_core::UserId;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for user profile updates.
///
/// The `Debug` impl redacts the access token.
#[derive(Clone)]
pub struct UserApiClient {
    /// Base URL of the user API (e.g. `https://tenant.example.com/api/v2`).
    base_url: String,
    /// Per-attempt bearer token supplied by the host.
    access_token: String,
    /// Underlying HTTP client.
    http_client: Client,
    /// Retry budget for transient failures.
    retry: RetryPolicy,
}

impl std::fmt::Debug for UserApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserApiClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("retry", &self.retry)
            .finish()
    }
}

impl UserApiClient {
    /// Create a new client for the given API domain and access token.
    ///
    /// `domain` may be a bare hostname (`tenant.example.com`) or a full
    /// base URL; bare hostnames get `https://` prepended.
    ///
    /// # Errors
    ///
    /// Returns [`UserApiError::InvalidConfig`] if the HTTP client cannot
    /// be constructed.
    pub fn new(domain: &str, access_token: &str) -> UserApiResult<Self> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("ruleflow-users/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                UserApiError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_http_client(domain, access_token, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(domain: &str, access_token: &str, http_client: Client) -> Self {
        Self {
            base_url: normalize_base_url(domain),
            access_token: access_token.to_string(),
            http_client,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Update top-level profile fields of a user (PATCH /users/:id).
    ///
    /// `fields` carries only the fields to change.
    pub async fn update_user(
        &self,
        user_id: &UserId,
        fields: &Map<String, Value>,
    ) -> UserApiResult<()> {
        self.patch_user_document(user_id, Value::Object(fields.clone()), "update_user")
            .await
    }

    /// Replace the user-editable metadata bucket of a user wholesale
    /// (PATCH /users/:id with the full map).
    pub async fn update_user_metadata(
        &self,
        user_id: &UserId,
        metadata: &Map<String, Value>,
    ) -> UserApiResult<()> {
        self.patch_user_document(
            user_id,
            json!({ "user_metadata": metadata }),
            "update_user_metadata",
        )
        .await
    }

    /// Replace the application-controlled metadata bucket of a user
    /// wholesale (PATCH /users/:id with the full map).
    pub async fn update_app_metadata(
        &self,
        user_id: &UserId,
        metadata: &Map<String, Value>,
    ) -> UserApiResult<()> {
        self.patch_user_document(
            user_id,
            json!({ "app_metadata": metadata }),
            "update_app_metadata",
        )
        .await
    }

    async fn patch_user_document(
        &self,
        user_id: &UserId,
        body: Value,
        operation: &str,
    ) -> UserApiResult<()> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        self.retry
            .execute(operation, || self.send_patch(&url, &body))
            .await
    }

    async fn send_patch(&self, url: &str, body: &Value) -> UserApiResult<()> {
        debug!("user API PATCH {}", url);
        let response = self
            .http_client
            .patch(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            Self::handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(response: reqwest::Response) -> UserApiResult<T> {
        let status = response.status();

        // Check for Retry-After header (rate limiting).
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::NOT_FOUND => Err(UserApiError::NotFound(body)),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("user API rate limited, retry after {:?}s", retry_after);
                Err(UserApiError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(UserApiError::Auth(format!(
                "Authentication failed ({}): {body}",
                status.as_u16()
            ))),
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(UserApiError::Api {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

/// Normalize a domain or base URL: ensure a scheme, strip trailing
/// slashes.
fn normalize_base_url(domain: &str) -> String {
    let trimmed = domain.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("tenant.example.com"),
            "https://tenant.example.com"
        );
        assert_eq!(
            normalize_base_url("https://tenant.example.com/"),
            "https://tenant.example.com"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8080"),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let client = UserApiClient::new("tenant.example.com", "sensitive-token").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sensitive-token"));
        assert!(debug.contains("REDACTED"));
    }
}
