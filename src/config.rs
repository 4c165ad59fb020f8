//! API endpoint configuration.
//!
//! Values are public (base URL, prefix, timeout); never put secrets here.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme + host (+ optional port) of the backend, without trailing slash.
    pub base_url: String,
    /// Path prefix every endpoint lives under, e.g. `/api/v1`.
    pub api_prefix: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PORTAL_API_BASE_URL`: default `http://localhost:8080`
    /// - `PORTAL_API_PREFIX`: default `/api/v1`
    /// - `PORTAL_REQUEST_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("PORTAL_API_BASE_URL").ok().as_deref(),
            std::env::var("PORTAL_API_PREFIX").ok().as_deref(),
            std::env::var("PORTAL_REQUEST_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    /// Build config from raw optional values; blank or unparsable values use defaults.
    #[must_use]
    pub fn from_values(base_url: Option<&str>, api_prefix: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let base_url = non_blank(base_url).unwrap_or(DEFAULT_API_BASE_URL);
        let api_prefix = api_prefix.map(str::trim).unwrap_or(DEFAULT_API_PREFIX);
        let request_timeout_secs = non_blank(timeout_secs)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_prefix: normalize_prefix(api_prefix),
            request_timeout_secs,
        }
    }

    /// Absolute URL for an endpoint path such as `/auth/user/me`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Join a base URL and a path with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();
    if base.is_empty() {
        return path.to_owned();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
