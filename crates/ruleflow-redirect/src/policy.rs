//! Redirect policy evaluation.
//!
//! Pure checks over the per-attempt context that decide whether an
//! interactive redirect may interrupt the current authentication attempt.

use ruleflow_core::AttemptContext;

/// Protocols for which a redirect is never permitted.
///
/// These either have no user-facing browser leg (machine-to-machine,
/// refresh and password grants) or are themselves the return leg of a
/// previously issued redirect. Constant for the lifetime of the process.
pub const NO_REDIRECT_PROTOCOLS: [&str; 4] = [
    "oauth2-resource-owner",
    "oauth2-refresh-token",
    "oauth2-password",
    "redirect-callback",
];

/// Protocol value marking the return leg of a redirect.
pub const REDIRECT_CALLBACK_PROTOCOL: &str = "redirect-callback";

/// Get the redirect URL already attached to the context, if any.
#[must_use]
pub fn redirect_url(context: &AttemptContext) -> Option<&str> {
    context.redirect.as_ref().map(|r| r.url.as_str())
}

/// Determine if the attempt's protocol allows a redirect to occur.
#[must_use]
pub fn protocol_can_redirect(context: &AttemptContext) -> bool {
    !NO_REDIRECT_PROTOCOLS.contains(&context.protocol.as_str())
}

/// Determine if this invocation is happening on the redirect return leg.
#[must_use]
pub fn is_redirect_callback(context: &AttemptContext) -> bool {
    context.protocol == REDIRECT_CALLBACK_PROTOCOL
}

/// Determine if the current attempt allows a redirect to happen.
///
/// Checks, in order, short-circuiting on the first failure:
///
/// 1. no other actor has already attached a redirect instruction;
/// 2. no multifactor challenge is in flight;
/// 3. the caller did not request silent authentication (`prompt=none`);
/// 4. the protocol is not in [`NO_REDIRECT_PROTOCOLS`].
#[must_use]
pub fn can_redirect(context: &AttemptContext) -> bool {
    // Don't redirect if someone else wants to.
    if redirect_url(context).is_some() {
        return false;
    }

    // A redirect must not interfere with an active MFA challenge.
    if context.multifactor.is_some() {
        return false;
    }

    // prompt=none requests silent auth; an interactive redirect would
    // surface an interaction-required error upstream.
    if context.query_param("prompt") == Some("none") {
        return false;
    }

    protocol_can_redirect(context)
}
