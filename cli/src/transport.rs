//! `reqwest` transport for running the session core natively.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use portal::config::join_url;
use portal::{ApiConfig, ApiError, ApiRequest, ApiResponse, Method, Transport};
use reqwest::header::AUTHORIZATION;

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs)).build()?;
        Ok(Self { client, base_url: config.base_url.clone() })
    }
}

pub(crate) fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn request_error(error: &reqwest::Error) -> ApiError {
    if error.is_timeout() { ApiError::Timeout } else { ApiError::Network(error.to_string()) }
}

#[async_trait::async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = join_url(&self.base_url, &request.path);
        let mut builder = self.client.request(method(request.method), &url);
        if let Some(value) = request.authorization() {
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| request_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| request_error(&e))?;
        tracing::debug!(%url, status, "http response");
        Ok(ApiResponse::new(status, body))
    }
}
