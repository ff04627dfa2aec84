//! Authentication-attempt context supplied by the host runtime.
//!
//! The host creates one [`AttemptContext`] per pass through the
//! authentication pipeline and discards it when the attempt ends. Nothing in
//! this workspace persists it; the only mutation performed here is attaching
//! a [`Redirect`] instruction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A redirect instruction attached to an attempt.
///
/// At most one redirect instruction may exist per attempt; policy evaluation
/// refuses to issue a second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Absolute URL the host should send the user agent to.
    pub url: String,
}

/// Request descriptor for the attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Client IP address as reported by the host.
    #[serde(default)]
    pub ip: String,

    /// Hostname the request was addressed to.
    #[serde(default)]
    pub hostname: String,

    /// Query parameters of the request.
    #[serde(default)]
    pub query: HashMap<String, String>,
}

/// Per-attempt context handed in by the host runtime.
///
/// Host-supplied objects cross a trust boundary this workspace does not
/// control, so they are plain data passed explicitly into every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptContext {
    /// Protocol identifier describing how the attempt was initiated
    /// (e.g. `"oidc-basic-profile"`, `"oauth2-password"`,
    /// `"redirect-callback"`).
    #[serde(default)]
    pub protocol: String,

    /// Redirect instruction, if some actor already issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,

    /// Marker for an active multifactor challenge. Presence means a
    /// challenge is in flight; the shape of the value is host-defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multifactor: Option<serde_json::Value>,

    /// Request descriptor.
    #[serde(default)]
    pub request: RequestInfo,
}

impl AttemptContext {
    /// Returns a query parameter by name, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.request.query.get(name).map(String::as_str)
    }
}
