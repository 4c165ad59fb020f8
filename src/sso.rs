//! SSO callback handling.
//!
//! The identity provider redirects back to `/auth/callback` with the session
//! token in the query string. Everything in that query is attacker-controlled:
//! the token must be JWT-shaped with the expected claims, `next` must be a
//! same-origin path, and the session is only established after the backend
//! confirms the token (see [`crate::session::SessionController::complete_sso`]).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::error::ApiError;
use crate::guard::paths;
use crate::types::UserKind;

const PROVIDER_FALLBACK: &str = "Authentication failed";

/// Why a callback could not produce a session. Each maps to a login redirect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The provider reported a failure (`error` / `hint` query parameters).
    #[error("identity provider error: {code}")]
    Provider { code: String, hint: Option<String> },
    /// `token` or `userType` missing, or `userType` unknown.
    #[error("invalid callback parameters")]
    InvalidCallback,
    /// The token is not a well-formed JWT carrying the required claims.
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// The backend did not accept the token.
    #[error("token verification failed: {0}")]
    Verification(#[source] ApiError),
}

impl CallbackError {
    /// Login page URL that reports this failure.
    pub fn redirect_url(&self) -> String {
        match self {
            Self::Provider { code, hint } => {
                let message = hint.as_deref().filter(|h| !h.is_empty()).unwrap_or(PROVIDER_FALLBACK);
                login_url(&[("error", code.as_str()), ("message", message)])
            }
            Self::InvalidCallback => login_url(&[("error", "invalid_callback")]),
            Self::InvalidToken(_) | Self::Verification(_) => login_url(&[("error", "invalid_token")]),
        }
    }
}

fn login_url(pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();
    format!("{}?{query}", paths::LOGIN)
}

/// Claims the callback token must carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    pub id: String,
    pub email: String,
}

/// A structurally valid callback, not yet verified with the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsoCallback {
    pub token: String,
    pub kind: UserKind,
    pub claims: TokenClaims,
    /// Post-login destination, present only when it is a safe same-origin path.
    pub next: Option<String>,
}

/// Parse and validate the callback query string (with or without leading `?`).
pub fn parse_callback(query: &str) -> Result<SsoCallback, CallbackError> {
    let mut token: Option<String> = None;
    let mut user_type: Option<String> = None;
    let mut next: Option<String> = None;
    let mut error: Option<String> = None;
    let mut hint: Option<String> = None;
    for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        let slot = match key.as_ref() {
            "token" => &mut token,
            "userType" => &mut user_type,
            "next" => &mut next,
            "error" => &mut error,
            "hint" => &mut hint,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    if let Some(code) = error.filter(|c| !c.is_empty()) {
        return Err(CallbackError::Provider { code, hint });
    }

    let (Some(token), Some(user_type)) = (token.filter(|t| !t.is_empty()), user_type) else {
        return Err(CallbackError::InvalidCallback);
    };
    let kind = user_type.parse::<UserKind>().map_err(|_| CallbackError::InvalidCallback)?;
    let claims = decode_claims(&token)?;
    let next = next.as_deref().and_then(safe_redirect);

    Ok(SsoCallback { token, kind, claims, next })
}

/// Decode the JWT payload segment without verifying the signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, CallbackError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(CallbackError::InvalidToken(format!("expected 3 segments, found {}", segments.len())));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CallbackError::InvalidToken(format!("payload is not base64url: {e}")))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| CallbackError::InvalidToken(format!("payload is not JSON: {e}")))?;
    let Value::Object(claims) = value else {
        return Err(CallbackError::InvalidToken("payload is not an object".to_owned()));
    };

    let non_empty = |key: &str| {
        claims.get(key).and_then(Value::as_str).map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
    };
    let id = non_empty("fiduciaryId")
        .or_else(|| non_empty("id"))
        .ok_or_else(|| CallbackError::InvalidToken("missing id claim".to_owned()))?;
    let email = non_empty("email").ok_or_else(|| CallbackError::InvalidToken("missing email claim".to_owned()))?;

    Ok(TokenClaims { id, email })
}

/// Origin `next` is resolved against; only its identity matters.
const REDIRECT_BASE: &str = "https://portal.invalid/";

/// Normalized same-origin path for `next`, or `None` when it could leave the site.
///
/// URL parsers drop tabs and newlines, so `/\t/host` would become
/// protocol-relative. Control characters and whitespace are rejected outright,
/// then the path is resolved against a fixed origin that must survive the join.
pub fn safe_redirect(next: &str) -> Option<String> {
    if !next.starts_with('/') || next.starts_with("//") || next.contains('\\') {
        return None;
    }
    if next.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return None;
    }
    let base = url::Url::parse(REDIRECT_BASE).ok()?;
    let resolved = base.join(next).ok()?;
    if resolved.origin() != base.origin() {
        return None;
    }
    let mut path = resolved.path().to_owned();
    if let Some(query) = resolved.query() {
        path.push('?');
        path.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        path.push('#');
        path.push_str(fragment);
    }
    Some(path)
}

pub fn is_safe_redirect(next: &str) -> bool {
    safe_redirect(next).is_some()
}

/// Human-readable notice for the login page, from the `error`/`message`
/// parameters a failed callback redirected with.
pub fn login_notice(query: &str) -> Option<String> {
    let mut code = None;
    let mut message = None;
    for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            "error" if code.is_none() => code = Some(value.into_owned()),
            "message" if message.is_none() => message = Some(value.into_owned()),
            _ => {}
        }
    }
    let code = code.filter(|c| !c.is_empty())?;
    if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
        return Some(message);
    }
    let text = match code.as_str() {
        "invalid_callback" => "Sign-in could not be completed. Please try again.",
        "invalid_token" => "Your sign-in link is invalid or has expired. Please sign in again.",
        _ => PROVIDER_FALLBACK,
    };
    Some(text.to_owned())
}

#[cfg(test)]
#[path = "sso_test.rs"]
mod tests;
