use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::storage::{MemoryStorage, TOKEN_KEY, USER_TYPE_KEY};
use crate::test_support::{MockTransport, client};

fn controller(storage: &MemoryStorage, transport: &MockTransport) -> SessionController<MemoryStorage, MockTransport> {
    SessionController::new(storage.clone(), client(transport))
}

fn persisted(token: &str, kind: &str) -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, token);
    storage.set(USER_TYPE_KEY, kind);
    storage
}

fn jwt(claims: &serde_json::Value) -> String {
    format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

fn signed_in_fiduciary(transport: &MockTransport) -> (MemoryStorage, SessionController<MemoryStorage, MockTransport>) {
    let storage = persisted("t1", "fiduciary");
    transport.reply(200, json!({ "fiduciaryId": "f-1", "email": "ops@acme.test", "organization": { "id": "org-1" } }));
    let session = controller(&storage, transport);
    block_on(session.initialize());
    assert!(session.state().is_authenticated());
    (storage, session)
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_without_token_makes_no_call() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    let session = controller(&storage, &transport);
    assert!(session.state().loading);

    block_on(session.initialize());

    assert_eq!(session.state(), AuthState::signed_out());
    assert!(transport.requests().is_empty());
}

#[test]
fn initialize_restores_persisted_session() {
    let storage = persisted("t1", "user");
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-1", "name": "Ana", "email": "ana@x.test", "age": 30 }));
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    let state = session.state();
    assert!(!state.loading);
    assert_eq!(state.token(), Some("t1"));
    assert_eq!(state.kind(), Some(UserKind::Individual));
    assert_eq!(state.identity().map(|i| i.id.as_str()), Some("u-1"));
    assert_eq!(state.error, None);

    let sent = transport.requests();
    assert_eq!(sent[0].path, "/api/v1/auth/user/me");
    assert_eq!(sent[0].bearer.as_deref(), Some("t1"));
}

#[test]
fn initialize_rejected_token_clears_storage() {
    let storage = persisted("stale", "fiduciary");
    let transport = MockTransport::new();
    transport.reply(401, json!({ "error": "Token expired" }));
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    let state = session.state();
    assert!(!state.loading);
    assert!(!state.is_authenticated());
    assert!(state.check_failed);
    assert_eq!(state.error.as_deref(), Some("Token expired"));
    assert!(storage.is_empty());
}

#[test]
fn initialize_network_failure_uses_generic_message() {
    let storage = persisted("t1", "user");
    let transport = MockTransport::new();
    transport.fail(ApiError::Network("connection refused".to_owned()));
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    let state = session.state();
    assert_eq!(state.error.as_deref(), Some(SESSION_CHECK_FAILED));
    assert!(state.check_failed);
    assert!(storage.is_empty());
}

#[test]
fn initialize_malformed_response_fails_check() {
    let storage = persisted("t1", "user");
    let transport = MockTransport::new();
    transport.reply_raw(200, "<html>");
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    assert!(session.state().check_failed);
    assert!(storage.is_empty());
}

#[test]
fn initialize_corrupt_kind_is_silently_cleared() {
    let storage = persisted("t1", "admin");
    let transport = MockTransport::new();
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    assert_eq!(session.state(), AuthState::signed_out());
    assert!(storage.is_empty());
    assert!(transport.requests().is_empty());
}

#[test]
fn initialize_rechecks_when_storage_changed_meanwhile() {
    let storage = persisted("old", "user");
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-old", "email": "old@x.test", "age": 30 }));
    transport.reply(200, json!({ "fiduciaryId": "f-new", "email": "new@acme.test", "organization": { "id": "org-1" } }));
    let racing = storage.clone();
    transport.on_send(move || {
        racing.set(TOKEN_KEY, "new");
        racing.set(USER_TYPE_KEY, "fiduciary");
    });
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    let state = session.state();
    assert!(!state.loading);
    assert_eq!(state.token(), Some("new"));
    assert_eq!(state.kind(), Some(UserKind::Fiduciary));
    assert_eq!(transport.paths(), vec!["/api/v1/auth/user/me", "/api/v1/auth/fiduciary/me"]);
    assert_eq!(crate::guard::decide(&state, "/dashboard", None), crate::guard::GuardDecision::Allow);
}

#[test]
fn initialize_signs_out_when_storage_cleared_meanwhile() {
    let storage = persisted("old", "user");
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-old", "email": "old@x.test", "age": 30 }));
    let racing = storage.clone();
    transport.on_send(move || crate::storage::clear(&racing));
    let session = controller(&storage, &transport);

    block_on(session.initialize());

    let state = session.state();
    assert_eq!(state, AuthState::signed_out());
    assert_eq!(crate::guard::decide(&state, "/dashboard", None), crate::guard::GuardDecision::Redirect("/login"));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn retry_after_failed_check_can_succeed() {
    let storage = persisted("t1", "user");
    let transport = MockTransport::new();
    transport.fail(ApiError::Timeout);
    let session = controller(&storage, &transport);
    block_on(session.initialize());
    assert!(session.state().check_failed);

    storage.set(TOKEN_KEY, "t2");
    storage.set(USER_TYPE_KEY, "user");
    transport.reply(200, json!({ "id": "u-1", "email": "a@b.com", "age": 22 }));
    block_on(session.retry());

    let state = session.state();
    assert!(!state.check_failed);
    assert_eq!(state.error, None);
    assert_eq!(state.token(), Some("t2"));
}

// =============================================================
// login
// =============================================================

#[test]
fn login_individual_without_age_goes_to_profile_onboarding() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "token": "t1", "userId": "u-1", "email": "a@b.com" }));
    let session = controller(&storage, &transport);
    block_on(session.initialize());

    let destination = block_on(session.login("a@b.com", "pw", UserKind::Individual)).unwrap();

    assert_eq!(destination, "/onboarding/profile");
    let state = session.state();
    assert_eq!(state.token(), Some("t1"));
    assert_eq!(state.identity().map(|i| i.name.as_str()), Some("a@b.com"));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(storage.get(USER_TYPE_KEY).as_deref(), Some("user"));
}

#[test]
fn login_individual_with_age_goes_to_dashboard() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "token": "t1", "user": { "id": "u-1", "email": "a@b.com", "age": 41 } }));
    let session = controller(&storage, &transport);

    let destination = block_on(session.login("a@b.com", "pw", UserKind::Individual)).unwrap();

    assert_eq!(destination, "/dashboard");
}

#[test]
fn login_fiduciary_without_organization_goes_to_org_onboarding() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "token": "t1", "fiduciaryId": "f-1", "email": "ops@acme.test" }));
    let session = controller(&storage, &transport);

    let destination = block_on(session.login("ops@acme.test", "pw", UserKind::Fiduciary)).unwrap();

    assert_eq!(destination, "/onboarding/organization");
    assert_eq!(transport.paths(), vec!["/api/v1/auth/fiduciary/login"]);
}

#[test]
fn login_rejected_keeps_state_and_carries_server_message() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(401, json!({ "error": "Invalid email or password" }));
    let session = controller(&storage, &transport);
    block_on(session.initialize());
    let before = session.state();

    let err = block_on(session.login("a@b.com", "wrong", UserKind::Individual)).unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(session.state(), before);
    assert!(storage.is_empty());
}

#[test]
fn login_rejected_keeps_existing_session() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);
    let before = session.state();
    transport.reply(401, json!({ "message": "Invalid email or password" }));

    let err = block_on(session.login("other@acme.test", "wrong", UserKind::Fiduciary)).unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(session.state(), before);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(storage.get(USER_TYPE_KEY).as_deref(), Some("fiduciary"));
}

#[test]
fn login_failure_without_message_uses_fallback() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply_raw(500, "");
    let session = controller(&storage, &transport);

    let err = block_on(session.login("a@b.com", "pw", UserKind::Individual)).unwrap_err();

    assert_eq!(err.to_string(), LOGIN_FAILED);
}

#[test]
fn login_without_token_is_rejected() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-1" }));
    let session = controller(&storage, &transport);

    let err = block_on(session.login("a@b.com", "pw", UserKind::Individual)).unwrap_err();

    assert_eq!(err, AuthError::MissingToken);
    assert!(!session.state().is_authenticated());
    assert!(storage.is_empty());
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_even_when_server_call_fails() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);
    transport.fail(ApiError::Network("offline".to_owned()));

    let destination = block_on(session.logout());

    assert_eq!(destination, "/login");
    assert!(!session.state().is_authenticated());
    assert!(storage.is_empty());
    let last = transport.requests().pop().unwrap();
    assert_eq!(last.path, "/api/v1/auth/fiduciary/logout");
    assert_eq!(last.bearer.as_deref(), Some("t1"));
}

#[test]
fn logout_without_session_skips_server_call() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    let session = controller(&storage, &transport);

    assert_eq!(block_on(session.logout()), "/login");
    assert!(transport.requests().is_empty());
}

// =============================================================
// profile merge and refresh
// =============================================================

#[test]
fn apply_profile_keeps_token_and_kind() {
    let transport = MockTransport::new();
    let (_storage, session) = signed_in_fiduciary(&transport);

    session.apply_profile(IdentityPatch { name: Some("Renamed".to_owned()), ..IdentityPatch::default() });

    let state = session.state();
    assert_eq!(state.identity().map(|i| i.name.as_str()), Some("Renamed"));
    assert_eq!(state.token(), Some("t1"));
    assert_eq!(state.kind(), Some(UserKind::Fiduciary));
}

#[test]
fn apply_profile_when_signed_out_is_noop() {
    let session = controller(&MemoryStorage::new(), &MockTransport::new());
    session.apply_profile(IdentityPatch { name: Some("x".to_owned()), ..IdentityPatch::default() });
    assert_eq!(session.state(), AuthState::loading());
}

#[test]
fn refresh_merges_new_onboarding_fields() {
    let storage = persisted("t1", "user");
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-1", "email": "a@b.com" }));
    let session = controller(&storage, &transport);
    block_on(session.initialize());
    assert_eq!(session.state().identity().map(Identity::landing_path), Some("/onboarding/profile"));

    transport.reply(200, json!({ "userId": "u-1", "email": "a@b.com", "age": 19 }));
    block_on(session.refresh()).unwrap();

    assert_eq!(session.state().identity().map(Identity::landing_path), Some("/dashboard"));
}

#[test]
fn refresh_unauthorized_signs_out() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);
    transport.reply(401, json!({}));

    let err = block_on(session.refresh()).unwrap_err();

    assert!(matches!(err, AuthError::Refresh(ApiError::Unauthorized { .. })));
    assert!(!session.state().is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn refresh_server_error_keeps_session() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);
    transport.reply(503, json!({ "message": "maintenance" }));

    assert!(block_on(session.refresh()).is_err());
    assert!(session.state().is_authenticated());
    assert!(!storage.is_empty());
}

#[test]
fn refresh_requires_session() {
    let session = controller(&MemoryStorage::new(), &MockTransport::new());
    assert_eq!(block_on(session.refresh()), Err(AuthError::NotAuthenticated));
}

// =============================================================
// unauthorized handling
// =============================================================

#[test]
fn unauthorized_on_dashboard_redirects_to_login() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);

    let redirect = session.handle_unauthorized(&ApiError::Unauthorized { message: None }, "t1", "/dashboard/purposes");

    assert_eq!(redirect, Some("/login"));
    assert!(!session.state().is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn unauthorized_on_login_page_only_cleans_up() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);

    assert_eq!(session.handle_unauthorized(&ApiError::Unauthorized { message: None }, "t1", "/login"), None);
    assert!(storage.is_empty());
}

#[test]
fn unauthorized_for_superseded_token_is_ignored() {
    let transport = MockTransport::new();
    let (storage, session) = signed_in_fiduciary(&transport);

    let redirect = session.handle_unauthorized(&ApiError::Unauthorized { message: None }, "t0", "/dashboard");

    assert_eq!(redirect, None);
    assert_eq!(session.state().token(), Some("t1"));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t1"));
}

#[test]
fn other_errors_do_not_touch_session() {
    let transport = MockTransport::new();
    let (_storage, session) = signed_in_fiduciary(&transport);

    let err = ApiError::Http { status: 403, message: None };
    assert_eq!(session.handle_unauthorized(&err, "t1", "/dashboard"), None);
    assert!(session.state().is_authenticated());
}

// =============================================================
// SSO
// =============================================================

#[test]
fn sso_verifies_token_before_signing_in() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "fiduciaryId": "f-7", "email": "sso@acme.test", "organization": { "id": "org-1" } }));
    let session = controller(&storage, &transport);
    let token = jwt(&json!({ "fiduciaryId": "f-7", "email": "sso@acme.test" }));

    let destination = block_on(session.complete_sso(&format!("token={token}&userType=fiduciary"))).unwrap();

    assert_eq!(destination, "/dashboard");
    assert_eq!(session.state().token(), Some(token.as_str()));
    assert_eq!(storage.get(USER_TYPE_KEY).as_deref(), Some("fiduciary"));
    assert_eq!(transport.requests()[0].path, "/api/v1/auth/fiduciary/me");
}

#[test]
fn sso_destination_comes_from_server_identity() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    // Claims say onboarding is done; the server says otherwise.
    transport.reply(200, json!({ "fiduciaryId": "f-7", "email": "sso@acme.test" }));
    let session = controller(&storage, &transport);
    let token = jwt(&json!({ "fiduciaryId": "f-7", "email": "sso@acme.test", "organization": { "id": "org-1" } }));

    let destination = block_on(session.complete_sso(&format!("token={token}&userType=fiduciary"))).unwrap();

    assert_eq!(destination, "/onboarding/organization");
}

#[test]
fn sso_honours_safe_next() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(200, json!({ "userId": "u-1", "email": "a@b.com", "age": 30 }));
    let session = controller(&storage, &transport);
    let token = jwt(&json!({ "id": "u-1", "email": "a@b.com" }));

    let query = format!("?token={token}&userType=user&next=%2Fdashboard%2Fprofile");
    assert_eq!(block_on(session.complete_sso(&query)).unwrap(), "/dashboard/profile");
}

#[test]
fn sso_rejected_token_clears_storage() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    transport.reply(401, json!({ "error": "invalid signature" }));
    let session = controller(&storage, &transport);
    let token = jwt(&json!({ "id": "u-1", "email": "a@b.com" }));

    let err = block_on(session.complete_sso(&format!("token={token}&userType=user"))).unwrap_err();

    assert!(matches!(err, CallbackError::Verification(_)));
    assert_eq!(err.redirect_url(), "/login?error=invalid_token");
    assert!(storage.is_empty());
    assert!(!session.state().is_authenticated());
}

#[test]
fn sso_malformed_token_makes_no_call() {
    let storage = MemoryStorage::new();
    let transport = MockTransport::new();
    let session = controller(&storage, &transport);

    let err = block_on(session.complete_sso("token=not-a-jwt&userType=user")).unwrap_err();

    assert!(matches!(err, CallbackError::InvalidToken(_)));
    assert!(transport.requests().is_empty());
    assert!(storage.is_empty());
}
