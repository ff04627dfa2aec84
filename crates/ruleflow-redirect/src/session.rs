//! Session token issuance and validation.
//!
//! The token proves "this redirect was initiated by us, for this user, at
//! this time" across the redirect round trip. It is a compact HS256-signed
//! token carried in the `session_token` query parameter of the redirect
//! target; the binding claim (issuer URL or random nonce) is selected by
//! [`SessionTokenConfig`](crate::SessionTokenConfig).

use crate::claims::{sanitize_extra, SessionClaims};
use crate::config::{SessionTokenConfig, TokenBinding};
use crate::error::SessionError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use ruleflow_core::{AttemptContext, UserRecord};
use serde_json::{Map, Value};

/// Query parameter carrying the session token on the redirect round trip.
pub const SESSION_TOKEN_PARAM: &str = "session_token";

/// Leeway in seconds for exp validation (clock skew tolerance).
const CLOCK_LEEWAY_SECS: u64 = 60;

/// Generate a 256-bit random nonce, hex-encoded (64 characters).
#[must_use]
pub fn generate_nonce() -> String {
    use rand::{rngs::OsRng, RngCore};
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issuer URL for the attempt, derived from the request hostname.
fn issuer_for(context: &AttemptContext) -> String {
    format!("https://{}/", context.request.hostname)
}

/// Create a signed session token binding the user and the attempt.
///
/// The claim set is `{sub, ip, <binding claim>, iat}` plus the caller's
/// extra claims. Extra claims MUST NOT contain sensitive information and
/// may not shadow the reserved claim names (shadowing keys are dropped).
///
/// Issuer mode stamps an expiry (`config.expires_in()`, default 3 days)
/// and binds `iss` to the request hostname. Nonce mode binds a fresh
/// random nonce, writes it to `user.rule_nonce`, and sets no expiry of
/// its own; callers control expiry through the extra claims.
///
/// # Errors
///
/// Returns [`SessionError::MissingSecret`] if the configuration carries
/// no signing secret, or [`SessionError::InvalidToken`] if signing fails.
pub fn create_session_token(
    config: &SessionTokenConfig,
    user: &mut UserRecord,
    context: &AttemptContext,
    extra_claims: Map<String, Value>,
) -> Result<String, SessionError> {
    let secret = config.secret().ok_or(SessionError::MissingSecret)?;
    let now = Utc::now().timestamp();

    let mut claims = SessionClaims {
        sub: Some(user.user_id.to_string()),
        ip: Some(context.request.ip.clone()),
        iss: None,
        nonce: None,
        exp: None,
        iat: Some(now),
        extra: sanitize_extra(extra_claims),
    };

    match config.binding() {
        TokenBinding::Issuer => {
            claims.iss = Some(issuer_for(context));
            claims.exp = Some(now + config.expires_in().as_secs() as i64);
            // The configured lifetime wins over a caller-supplied exp.
            claims.extra.remove("exp");
        }
        TokenBinding::Nonce => {
            let nonce = generate_nonce();
            user.rule_nonce = Some(nonce.clone());
            claims.nonce = Some(nonce);
        }
    }

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::InvalidToken(format!("Signing failed: {e}")))
}

/// Validate the session token returned in the inbound query parameters.
///
/// Verifies the signature and the binding appropriate to the configured
/// mode, then returns only the caller-trustworthy payload: the extra
/// claims with every standard/binding field stripped.
///
/// Issuer mode requires `sub == user.user_id` and
/// `iss == https://{hostname}/` as part of verification and rejects a
/// verified payload that carries no expiry claim at all. Nonce mode
/// compares the token nonce against `user.rule_nonce` and the subject
/// against `user.user_id` after signature verification; expiry is
/// enforced whenever present but its presence is the caller's to require.
///
/// # Errors
///
/// - [`SessionError::MissingToken`] - no `session_token` parameter
/// - [`SessionError::BadSignature`] - signature verification failed
/// - [`SessionError::TokenExpired`] - expiry claim is in the past
/// - [`SessionError::InvalidIssuer`] / [`SessionError::InvalidSubject`] -
///   issuer-mode binding mismatch
/// - [`SessionError::MissingExpiry`] - issuer-mode token without expiry
/// - [`SessionError::InvalidNonce`] / [`SessionError::InvalidUser`] -
///   nonce-mode binding mismatch
pub fn validate_session_token(
    config: &SessionTokenConfig,
    context: &AttemptContext,
    user: &UserRecord,
) -> Result<Map<String, Value>, SessionError> {
    let secret = config.secret().ok_or(SessionError::MissingSecret)?;
    let token = context
        .query_param(SESSION_TOKEN_PARAM)
        .ok_or(SessionError::MissingToken)?;
    let key = DecodingKey::from_secret(secret.as_bytes());

    match config.binding() {
        TokenBinding::Issuer => {
            let mut validation = Validation::default();
            validation.leeway = CLOCK_LEEWAY_SECS;
            validation.validate_aud = false;
            validation.set_required_spec_claims(&["iss", "sub"]);
            validation.set_issuer(&[issuer_for(context)]);
            validation.sub = Some(user.user_id.to_string());

            let data: TokenData<SessionClaims> =
                decode(token, &key, &validation).map_err(map_jwt_error)?;

            // A valid-but-unbounded token is rejected outright.
            if data.claims.exp.is_none() {
                return Err(SessionError::MissingExpiry);
            }

            Ok(data.claims.into_extra())
        }
        TokenBinding::Nonce => {
            let mut validation = Validation::default();
            validation.leeway = CLOCK_LEEWAY_SECS;
            validation.validate_aud = false;
            // Expiry is enforced when present; its presence is the
            // caller's to require.
            validation.required_spec_claims.clear();

            let data: TokenData<SessionClaims> =
                decode(token, &key, &validation).map_err(map_jwt_error)?;
            let claims = data.claims;

            match (claims.nonce.as_deref(), user.rule_nonce.as_deref()) {
                (Some(token_nonce), Some(user_nonce)) if token_nonce == user_nonce => {}
                _ => return Err(SessionError::InvalidNonce),
            }

            if claims.sub.as_deref() != Some(user.user_id.as_str()) {
                return Err(SessionError::InvalidUser);
            }

            Ok(claims.into_extra())
        }
    }
}

/// Map jsonwebtoken errors to [`SessionError`].
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> SessionError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => SessionError::TokenExpired,
        ErrorKind::InvalidSignature => SessionError::BadSignature,
        ErrorKind::InvalidIssuer => SessionError::InvalidIssuer,
        ErrorKind::InvalidSubject => SessionError::InvalidSubject,
        ErrorKind::MissingRequiredClaim(claim) => SessionError::MissingClaim(claim.to_string()),
        ErrorKind::InvalidToken => SessionError::InvalidToken("Malformed token".to_string()),
        ErrorKind::Base64(_) => SessionError::InvalidToken("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => SessionError::InvalidToken("Invalid JSON in claims".to_string()),
        _ => SessionError::InvalidToken(format!("Token validation failed: {err}")),
    }
}
