//! Scripted transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Replays queued responses in order and records every request.
///
/// Clones share the queue and the log, so a test can keep a handle after
/// moving the transport into a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Rc<RefCell<VecDeque<Result<ApiResponse, ApiError>>>>,
    requests: Rc<RefCell<Vec<ApiRequest>>>,
    on_send: Rc<RefCell<Option<Box<dyn Fn()>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: Value) -> &Self {
        self.replies.borrow_mut().push_back(Ok(ApiResponse::new(status, body.to_string())));
        self
    }

    pub fn reply_raw(&self, status: u16, body: &str) -> &Self {
        self.replies.borrow_mut().push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(&self, error: ApiError) -> &Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    /// Run `hook` while each request is in flight, before its reply is returned.
    pub fn on_send(&self, hook: impl Fn() + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.path.clone()).collect()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook();
        }
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_owned())))
    }
}

pub fn client(transport: &MockTransport) -> ApiClient<MockTransport> {
    ApiClient::new(transport.clone(), &ApiConfig::default())
}
