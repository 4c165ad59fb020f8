use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_portal_env() {
    unsafe {
        std::env::remove_var("PORTAL_API_BASE_URL");
        std::env::remove_var("PORTAL_API_PREFIX");
        std::env::remove_var("PORTAL_REQUEST_TIMEOUT_SECS");
    }
}

#[test]
fn from_values_uses_defaults_when_absent() {
    let cfg = ApiConfig::from_values(None, None, None);
    assert_eq!(cfg, ApiConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.api_prefix, DEFAULT_API_PREFIX);
    assert_eq!(cfg.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn from_values_normalizes_base_and_prefix() {
    let cfg = ApiConfig::from_values(Some(" https://api.example.test/ "), Some("v2/"), Some("30"));
    assert_eq!(cfg.base_url, "https://api.example.test");
    assert_eq!(cfg.api_prefix, "/v2");
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn from_values_allows_empty_prefix() {
    let cfg = ApiConfig::from_values(None, Some(""), None);
    assert_eq!(cfg.api_prefix, "");
}

#[test]
fn from_values_ignores_bad_timeouts() {
    assert_eq!(ApiConfig::from_values(None, None, Some("soon")).request_timeout_secs, 10);
    assert_eq!(ApiConfig::from_values(None, None, Some("0")).request_timeout_secs, 10);
}

#[test]
fn join_url_inserts_single_slash() {
    assert_eq!(join_url("http://h:1/", "/api/v1/x"), "http://h:1/api/v1/x");
    assert_eq!(join_url("http://h:1", "api/v1/x"), "http://h:1/api/v1/x");
    assert_eq!(join_url("", "/api/v1/x"), "/api/v1/x");
}

#[test]
fn from_env_reads_overrides() {
    unsafe {
        clear_portal_env();
        std::env::set_var("PORTAL_API_BASE_URL", "https://consent.example.test/");
        std::env::set_var("PORTAL_REQUEST_TIMEOUT_SECS", "5");
    }

    let cfg = ApiConfig::from_env();
    assert_eq!(cfg.base_url, "https://consent.example.test");
    assert_eq!(cfg.api_prefix, "/api/v1");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.url("/api/v1/auth/user/me"), "https://consent.example.test/api/v1/auth/user/me");

    unsafe { clear_portal_env() };
}
