//! Error types shared by the API client and the session controller.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, authentication rejections and server business errors
//! stay distinct so callers can decide between "retry", "sign in again" and
//! "show the server's message". Client-side validation failures live in
//! [`crate::forms`] and never reach the network.

/// Failure of a single API call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("unable to reach the server: {0}")]
    Network(String),
    /// The request was aborted after the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The server answered `401`; the session token is no longer valid.
    #[error("authentication rejected{}", detail(.message.as_deref()))]
    Unauthorized { message: Option<String> },
    /// Any other non-2xx answer. `message` is the payload's `error` or `message` field.
    #[error("request failed ({status}){}", detail(.message.as_deref()))]
    Http { status: u16, message: Option<String> },
    /// A 2xx body that could not be decoded into the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
    /// The request body could not be encoded.
    #[error("request error: {0}")]
    Serialization(String),
}

fn detail(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// Message supplied by the server in the error payload, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Server message when present, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }
}

/// Failure of a session operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Login was rejected or could not complete. `message` is safe to show.
    #[error("{message}")]
    Login {
        message: String,
        #[source]
        source: ApiError,
    },
    /// The login response carried no usable token.
    #[error("login response did not include a session token")]
    MissingToken,
    /// The operation needs a session and there is none.
    #[error("not signed in")]
    NotAuthenticated,
    /// Re-fetching the current identity failed.
    #[error("failed to refresh session: {0}")]
    Refresh(#[source] ApiError),
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
