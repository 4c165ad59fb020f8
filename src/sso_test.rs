use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::*;

fn jwt(payload: &str) -> String {
    format!("header.{}.signature", URL_SAFE_NO_PAD.encode(payload))
}

// =============================================================
// parse_callback
// =============================================================

#[test]
fn provider_error_wins_over_token() {
    let err = parse_callback("error=access_denied&hint=User%20cancelled&token=x&userType=user").unwrap_err();
    assert_eq!(err, CallbackError::Provider { code: "access_denied".to_owned(), hint: Some("User cancelled".to_owned()) });
    assert_eq!(err.redirect_url(), "/login?error=access_denied&message=User+cancelled");
}

#[test]
fn provider_error_without_hint_uses_fallback_message() {
    let err = parse_callback("?error=server_error").unwrap_err();
    assert_eq!(err.redirect_url(), "/login?error=server_error&message=Authentication+failed");
}

#[test]
fn missing_parameters_are_invalid_callback() {
    assert_eq!(parse_callback(""), Err(CallbackError::InvalidCallback));
    assert_eq!(parse_callback("token=a.b.c"), Err(CallbackError::InvalidCallback));
    assert_eq!(parse_callback("userType=user"), Err(CallbackError::InvalidCallback));
    assert_eq!(CallbackError::InvalidCallback.redirect_url(), "/login?error=invalid_callback");
}

#[test]
fn unknown_user_type_is_invalid_callback() {
    let token = jwt(r#"{"id":"u-1","email":"a@b.com"}"#);
    assert_eq!(parse_callback(&format!("token={token}&userType=admin")), Err(CallbackError::InvalidCallback));
}

#[test]
fn valid_callback_carries_claims_and_kind() {
    let token = jwt(r#"{"fiduciaryId":"f-1","email":"ops@acme.test","organization":{"id":"o"}}"#);
    let callback = parse_callback(&format!("token={token}&userType=fiduciary&next=/dashboard/dsr")).unwrap();
    assert_eq!(callback.kind, UserKind::Fiduciary);
    assert_eq!(callback.claims, TokenClaims { id: "f-1".to_owned(), email: "ops@acme.test".to_owned() });
    assert_eq!(callback.next.as_deref(), Some("/dashboard/dsr"));
    assert_eq!(callback.token, token);
}

#[test]
fn unsafe_next_is_dropped() {
    let token = jwt(r#"{"id":"u-1","email":"a@b.com"}"#);
    for next in [
        "https%3A%2F%2Fevil.test",
        "%2F%2Fevil.test",
        "%2F%5Cevil.test",
        "dashboard",
        "%2F%09%2Fevil.test%2Fx",
        "%2F%0A%2Fevil.test%2Fx",
        "%2F%0D%2Fevil.test",
    ] {
        let callback = parse_callback(&format!("token={token}&userType=user&next={next}")).unwrap();
        assert_eq!(callback.next, None, "next={next}");
    }
}

// =============================================================
// decode_claims
// =============================================================

#[test]
fn token_must_have_three_segments() {
    assert!(matches!(decode_claims("a.b"), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims("a.b.c.d"), Err(CallbackError::InvalidToken(_))));
}

#[test]
fn payload_must_be_base64url_json_object() {
    assert!(matches!(decode_claims("h.!!!.s"), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims(&jwt("not json")), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims(&jwt("[1,2]")), Err(CallbackError::InvalidToken(_))));
}

#[test]
fn claims_require_id_and_email() {
    assert!(matches!(decode_claims(&jwt(r#"{"email":"a@b.com"}"#)), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims(&jwt(r#"{"id":"","email":"a@b.com"}"#)), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims(&jwt(r#"{"id":"u-1"}"#)), Err(CallbackError::InvalidToken(_))));
    assert!(matches!(decode_claims(&jwt(r#"{"id":7,"email":"a@b.com"}"#)), Err(CallbackError::InvalidToken(_))));
}

#[test]
fn padded_payload_is_accepted() {
    let payload = URL_SAFE_NO_PAD.encode(r#"{"id":"u-1","email":"a@b.com"}"#);
    let claims = decode_claims(&format!("h.{payload}==.s")).unwrap();
    assert_eq!(claims.id, "u-1");
}

#[test]
fn fiduciary_id_takes_precedence() {
    let claims = decode_claims(&jwt(r#"{"id":"generic","fiduciaryId":"f-1","email":"a@b.com"}"#)).unwrap();
    assert_eq!(claims.id, "f-1");
}

#[test]
fn is_safe_redirect_rules() {
    assert!(is_safe_redirect("/dashboard"));
    assert!(is_safe_redirect("/onboarding/profile?x=1"));
    assert!(!is_safe_redirect("//evil.test"));
    assert!(!is_safe_redirect("/\\evil.test"));
    assert!(!is_safe_redirect("https://evil.test"));
    assert!(!is_safe_redirect(""));
    assert!(!is_safe_redirect("/\t/evil.test/x"));
    assert!(!is_safe_redirect("/\n/evil.test/x"));
    assert!(!is_safe_redirect("/ /evil.test"));
}

#[test]
fn safe_redirect_normalizes_path() {
    assert_eq!(safe_redirect("/dashboard/../dashboard/dsr").as_deref(), Some("/dashboard/dsr"));
    assert_eq!(safe_redirect("/dashboard?tab=open#top").as_deref(), Some("/dashboard?tab=open#top"));
    assert_eq!(safe_redirect("/\t/evil.test"), None);
}

// =============================================================
// login_notice
// =============================================================

#[test]
fn login_notice_prefers_explicit_message() {
    assert_eq!(login_notice("error=access_denied&message=User+cancelled").as_deref(), Some("User cancelled"));
}

#[test]
fn login_notice_maps_known_codes() {
    assert!(login_notice("?error=invalid_token").is_some_and(|m| m.contains("expired")));
    assert_eq!(login_notice("error=other").as_deref(), Some("Authentication failed"));
    assert_eq!(login_notice("next=/dashboard"), None);
}
