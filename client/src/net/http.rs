//! `fetch`-backed transport for the session core.
//!
//! Browser builds (`csr`): real HTTP via `gloo-net` with an abort-signal
//! timeout. Other builds: a stub that reports the network as unavailable,
//! so native unit tests never touch the DOM.
//!
//! ERROR HANDLING
//! ==============
//! Every HTTP status comes back as a response; only failures to get one or
//! to read its body (DNS, CORS, abort) become `ApiError::Network` /
//! `ApiError::Timeout`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use portal::config::join_url;
use portal::{ApiConfig, ApiError, ApiRequest, ApiResponse, Transport};

/// Sends [`ApiRequest`]s with `fetch`.
#[derive(Clone, Debug)]
pub struct BrowserTransport {
    base_url: String,
    timeout_ms: u32,
}

impl BrowserTransport {
    pub fn new(config: &ApiConfig) -> Self {
        let timeout_ms = u32::try_from(config.request_timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        Self { base_url: config.base_url.clone(), timeout_ms }
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Classify a `gloo-net` failure message. Aborts come from the timeout.
pub(crate) fn request_error(message: &str) -> ApiError {
    let lowered = message.to_lowercase();
    if lowered.contains("abort") || lowered.contains("timeout") {
        ApiError::Timeout
    } else {
        ApiError::Network(message.to_owned())
    }
}

/// Response body, or the failure that interrupted reading it.
pub(crate) fn read_body<E: std::fmt::Display>(read: Result<String, E>) -> Result<String, ApiError> {
    read.map_err(|e| request_error(&e.to_string()))
}

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            send_with_timeout(&self.url(&request.path), request, self.timeout_ms).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(ApiError::Network("not available outside the browser".to_owned()))
        }
    }
}

#[cfg(feature = "csr")]
async fn send_with_timeout(url: &str, request: ApiRequest, timeout_ms: u32) -> Result<ApiResponse, ApiError> {
    use gloo_net::http::{Method as HttpMethod, RequestBuilder};
    use gloo_timers::callback::Timeout;
    use portal::Method;
    use web_sys::AbortController;

    let controller = AbortController::new().map_err(|_| ApiError::Network("failed to create abort controller".to_owned()))?;
    let signal = controller.signal();
    let abort = controller.clone();
    let _timeout = Timeout::new(timeout_ms, move || abort.abort());

    let method = match request.method {
        Method::Get => HttpMethod::GET,
        Method::Post => HttpMethod::POST,
        Method::Put => HttpMethod::PUT,
        Method::Delete => HttpMethod::DELETE,
    };
    let mut builder = RequestBuilder::new(url).method(method).abort_signal(Some(&signal));
    if let Some(authorization) = request.authorization() {
        builder = builder.header("Authorization", &authorization);
    }
    let built = match request.body {
        Some(body) => builder.json(&body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let response = built.send().await.map_err(|e| request_error(&e.to_string()))?;
    let status = response.status();
    let body = read_body(response.text().await)?;
    Ok(ApiResponse::new(status, body))
}
