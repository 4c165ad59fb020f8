use super::*;
use crate::session::{AuthState, Session};
use crate::types::{Identity, OrganizationRef};

fn signed_in(kind: UserKind, onboarded: bool) -> AuthState {
    let identity = Identity {
        id: "id-1".to_owned(),
        name: "Name".to_owned(),
        email: "a@b.com".to_owned(),
        kind,
        organization: (onboarded && kind == UserKind::Fiduciary)
            .then(|| OrganizationRef { id: "org-1".to_owned(), name: None }),
        age: (onboarded && kind == UserKind::Individual).then_some(28),
        guardian_email: None,
        avatar: None,
        phone: None,
    };
    AuthState::signed_in(Session { identity, token: "t".to_owned() })
}

#[test]
fn loading_is_pending() {
    assert_eq!(decide(&AuthState::loading(), "/dashboard", None), GuardDecision::Pending);
}

#[test]
fn signed_out_redirects_to_login() {
    assert_eq!(decide(&AuthState::signed_out(), "/dashboard", None), GuardDecision::Redirect("/login"));
}

#[test]
fn fiduciary_without_organization_redirects_to_onboarding() {
    let state = signed_in(UserKind::Fiduciary, false);
    assert_eq!(decide(&state, "/dashboard", None), GuardDecision::Redirect("/onboarding/organization"));
}

#[test]
fn fiduciary_without_organization_stays_on_onboarding() {
    let state = signed_in(UserKind::Fiduciary, false);
    assert_eq!(decide(&state, "/onboarding/organization", None), GuardDecision::Allow);
}

#[test]
fn individual_without_age_redirects_to_profile_step() {
    let state = signed_in(UserKind::Individual, false);
    assert_eq!(decide(&state, "/dashboard/profile", None), GuardDecision::Redirect("/onboarding/profile"));
}

#[test]
fn onboarded_session_leaves_onboarding() {
    let state = signed_in(UserKind::Individual, true);
    assert_eq!(decide(&state, "/onboarding/profile", None), GuardDecision::Redirect("/dashboard"));
}

#[test]
fn kind_mismatch_is_denied() {
    let state = signed_in(UserKind::Individual, true);
    assert_eq!(decide(&state, "/dashboard/purposes", Some(UserKind::Fiduciary)), GuardDecision::Deny);
}

#[test]
fn onboarding_redirect_beats_kind_mismatch() {
    let state = signed_in(UserKind::Individual, false);
    assert_eq!(
        decide(&state, "/dashboard/purposes", Some(UserKind::Fiduciary)),
        GuardDecision::Redirect("/onboarding/profile")
    );
}

#[test]
fn matching_kind_is_allowed() {
    let state = signed_in(UserKind::Fiduciary, true);
    assert_eq!(decide(&state, "/dashboard/dsr", Some(UserKind::Fiduciary)), GuardDecision::Allow);
}

#[test]
fn is_under_matches_whole_segments() {
    assert!(is_under("/onboarding", "/onboarding"));
    assert!(is_under("/onboarding/profile?step=2", "/onboarding"));
    assert!(is_under("/login/", "/login"));
    assert!(!is_under("/onboardingx", "/onboarding"));
    assert!(!is_under("/dashboard", "/onboarding"));
}

#[test]
fn home_destination_follows_session() {
    assert_eq!(home_destination(&AuthState::loading()), None);
    assert_eq!(home_destination(&AuthState::signed_out()), Some("/login"));
    assert_eq!(home_destination(&signed_in(UserKind::Fiduciary, false)), Some("/onboarding/organization"));
    assert_eq!(home_destination(&signed_in(UserKind::Fiduciary, true)), Some("/dashboard"));
}
