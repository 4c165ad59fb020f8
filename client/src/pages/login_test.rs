use super::*;

#[test]
fn kind_labels() {
    assert_eq!(kind_label(UserKind::Individual), "Individual");
    assert_eq!(kind_label(UserKind::Fiduciary), "Organization");
}

#[test]
fn sso_error_wins_over_session_error() {
    let notice = initial_notice("?error=invalid_token", Some("Failed to verify authentication"));
    assert_eq!(
        notice,
        Some((AlertKind::Error, "Your sign-in link is invalid or has expired. Please sign in again.".to_owned()))
    );
}

#[test]
fn session_error_shown_without_query() {
    assert_eq!(
        initial_notice("", Some("Failed to verify authentication")),
        Some((AlertKind::Error, "Failed to verify authentication".to_owned()))
    );
    assert_eq!(initial_notice("", None), None);
}

#[test]
fn provider_message_is_passed_through() {
    let notice = initial_notice("?error=access_denied&message=User%20cancelled", None);
    assert_eq!(notice, Some((AlertKind::Error, "User cancelled".to_owned())));
}
