//! User record supplied by the host runtime.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-attempt snapshot of the authenticating user.
///
/// The record is created fresh by the host for every attempt. `rule_nonce`
/// is the one field written by this workspace: nonce-bound session tokens
/// store their nonce here at issuance and compare against it at validation.
/// The nonce is never sent to the client; it survives the redirect round
/// trip only through whatever session-continuation store backs this record
/// on the host side, so issuance and validation must see the same record
/// instance for the same logical attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable user identifier. Never mutated by this workspace.
    #[serde(default)]
    pub user_id: UserId,

    /// Nonce bound to the most recently issued session token, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_nonce: Option<String>,

    /// User-editable profile metadata.
    #[serde(default)]
    pub user_metadata: Map<String, Value>,

    /// Application-controlled metadata.
    #[serde(default)]
    pub app_metadata: Map<String, Value>,

    /// Remaining top-level profile fields (email, nickname, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserRecord {
    /// Creates a record with the given identifier and empty metadata.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}
