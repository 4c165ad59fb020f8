use super::*;

#[test]
fn server_message_reads_unauthorized_and_http_payloads() {
    let unauthorized = ApiError::Unauthorized { message: Some("invalid credentials".to_owned()) };
    assert_eq!(unauthorized.server_message(), Some("invalid credentials"));

    let http = ApiError::Http { status: 422, message: Some("name taken".to_owned()) };
    assert_eq!(http.server_message(), Some("name taken"));

    assert_eq!(ApiError::Timeout.server_message(), None);
    assert_eq!(ApiError::Network("refused".to_owned()).server_message(), None);
}

#[test]
fn user_message_falls_back_when_server_is_silent() {
    let err = ApiError::Http { status: 500, message: None };
    assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
}

#[test]
fn display_includes_status_and_detail() {
    let err = ApiError::Http { status: 404, message: Some("not found".to_owned()) };
    assert_eq!(err.to_string(), "request failed (404): not found");

    let bare = ApiError::Unauthorized { message: None };
    assert_eq!(bare.to_string(), "authentication rejected");
}

#[test]
fn login_error_displays_user_message() {
    let err = AuthError::Login {
        message: "Account locked".to_owned(),
        source: ApiError::Http { status: 403, message: Some("Account locked".to_owned()) },
    };
    assert_eq!(err.to_string(), "Account locked");
}
