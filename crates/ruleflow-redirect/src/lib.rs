//! Redirect policy and signed session tokens for login-flow hooks.
//!
//! This crate provides:
//! - Pure policy checks deciding whether an in-flight authentication
//!   attempt may be interrupted with an out-of-band redirect
//! - Issuance and validation of the HS256-signed session token that
//!   proves continuity of identity and freshness across the redirect
//!   round trip, with a pluggable anti-replay binding (issuer URL or
//!   random nonce)
//!
//! # Example
//!
//! ```
//! use ruleflow_core::{AttemptContext, RequestInfo, UserRecord};
//! use ruleflow_redirect::{
//!     can_redirect, is_redirect_callback, issue_redirect, validate_session_token,
//!     SessionTokenConfig, SessionTokenParam,
//! };
//!
//! # fn main() -> Result<(), ruleflow_redirect::SessionError> {
//! let config = SessionTokenConfig::new("a-long-random-secret");
//! let mut user = UserRecord::new("auth0|5f7c8ec7");
//! let mut ctx = AttemptContext {
//!     protocol: "oidc-basic-profile".to_string(),
//!     request: RequestInfo {
//!         ip: "203.0.113.9".to_string(),
//!         hostname: "tenant.example.com".to_string(),
//!         ..RequestInfo::default()
//!     },
//!     ..AttemptContext::default()
//! };
//!
//! if is_redirect_callback(&ctx) {
//!     // Return leg: verify the token before trusting anything.
//!     let _claims = validate_session_token(&config, &ctx, &user)?;
//! } else if can_redirect(&ctx) {
//!     // Outbound leg: send the user away with a fresh token.
//!     issue_redirect(
//!         &config,
//!         &mut ctx,
//!         &mut user,
//!         "https://verify.example.com",
//!         SessionTokenParam::Generate,
//!     )?;
//! }
//! # Ok(())
//! # }
//! ```

mod claims;
mod config;
mod error;
mod policy;
mod redirect;
mod session;

// Re-export public API
pub use claims::{SessionClaims, RESERVED_CLAIMS};
pub use config::{
    parse_expires_in, SessionTokenConfig, TokenBinding, DEFAULT_EXPIRES_IN,
    SESSION_TOKEN_EXPIRES_IN_VAR, SESSION_TOKEN_SECRET_VAR,
};
pub use error::SessionError;
pub use policy::{
    can_redirect, is_redirect_callback, protocol_can_redirect, redirect_url,
    NO_REDIRECT_PROTOCOLS, REDIRECT_CALLBACK_PROTOCOL,
};
pub use redirect::{issue_redirect, SessionTokenParam};
pub use session::{
    create_session_token, generate_nonce, validate_session_token, SESSION_TOKEN_PARAM,
};
