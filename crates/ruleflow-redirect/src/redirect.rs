//! Redirect issuance.

use crate::config::SessionTokenConfig;
use crate::error::SessionError;
use crate::policy::can_redirect;
use crate::session::{create_session_token, SESSION_TOKEN_PARAM};
use ruleflow_core::{AttemptContext, Redirect, UserRecord};
use serde_json::Map;

/// How the session token parameter of an outbound redirect is produced.
#[derive(Debug, Clone, Default)]
pub enum SessionTokenParam {
    /// Mint a fresh token for the user and attempt.
    #[default]
    Generate,

    /// Attach a caller-supplied token verbatim.
    Provided(String),

    /// Issue a plain redirect with no token.
    Omit,
}

/// Check that a redirect is currently permitted and attach it to the
/// context.
///
/// On success `context.redirect` is set to the target URL with the
/// session token appended as the `session_token` query parameter
/// (unless [`SessionTokenParam::Omit`] was requested). On failure the
/// context is left untouched.
///
/// # Errors
///
/// Returns [`SessionError::RedirectNotAllowed`] if policy forbids a
/// redirect or `url` is empty, and any issuance error from
/// [`create_session_token`] when generating a fresh token.
pub fn issue_redirect(
    config: &SessionTokenConfig,
    context: &mut AttemptContext,
    user: &mut UserRecord,
    url: &str,
    token: SessionTokenParam,
) -> Result<(), SessionError> {
    if !can_redirect(context) || url.is_empty() {
        return Err(SessionError::RedirectNotAllowed);
    }

    let token_param = match token {
        SessionTokenParam::Generate => {
            Some(create_session_token(config, user, context, Map::new())?)
        }
        SessionTokenParam::Provided(token) => Some(token),
        SessionTokenParam::Omit => None,
    };

    let url = match token_param {
        Some(token) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{url}{separator}{SESSION_TOKEN_PARAM}={token}")
        }
        None => url.to_string(),
    };

    context.redirect = Some(Redirect { url });
    Ok(())
}
