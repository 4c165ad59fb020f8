//! Session core for the consent portal front-end.
//!
//! Framework-agnostic pieces shared by the browser client and the operator
//! CLI: wire types, a typed API client over an injected [`transport::Transport`],
//! the [`session::SessionController`] that owns the signed-in identity and
//! its persisted token, the pure route [`guard`], SSO callback validation and
//! client-side form checks.
//!
//! Nothing here knows about the DOM or an async runtime; hosts supply a
//! [`storage::Storage`] and a transport and drive the futures themselves.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod session;
pub mod sso;
pub mod storage;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, AuthError};
pub use guard::GuardDecision;
pub use session::{AuthState, Session, SessionController};
pub use storage::{MemoryStorage, Storage};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
pub use types::{Identity, UserKind};
