//! Auth context shared through Leptos.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionController`] per tab owns the session. The context keeps it
//! behind a local `StoredValue` and mirrors its state into an `RwSignal` after
//! every operation so guards and pages re-render. Pages never mutate the
//! signal directly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::sso::CallbackError;
use portal::types::{IdentityPatch, UserKind};
use portal::{ApiClient, ApiConfig, ApiError, AuthError, AuthState, SessionController};

use crate::net::config;
use crate::net::http::BrowserTransport;
use crate::util::browser::current_path;
use crate::util::storage::WebStorage;

pub type BrowserSession = SessionController<WebStorage, BrowserTransport>;

/// Build a controller for `config` with the given starting state.
pub fn browser_session(config: &ApiConfig, state: AuthState) -> BrowserSession {
    let api = ApiClient::new(BrowserTransport::new(config), config);
    SessionController::with_state(WebStorage, api, state)
}

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    pub is_authenticated: Signal<bool>,
    controller: StoredValue<Rc<BrowserSession>, LocalStorage>,
}

impl AuthContext {
    pub fn new(controller: BrowserSession) -> Self {
        let state = RwSignal::new(controller.state());
        let is_authenticated = Signal::derive(move || state.with(AuthState::is_authenticated));
        Self { state, is_authenticated, controller: StoredValue::new_local(Rc::new(controller)) }
    }

    pub fn session(&self) -> Rc<BrowserSession> {
        self.controller.get_value()
    }

    /// Copy the controller's state into the reactive signal.
    fn sync(&self) {
        self.state.set(self.session().state());
    }

    pub fn kind(&self) -> Option<UserKind> {
        self.state.with_untracked(AuthState::kind)
    }

    pub async fn initialize(&self) {
        self.session().initialize().await;
        self.sync();
    }

    pub async fn retry(&self) {
        self.state.update(|s| s.loading = true);
        self.session().retry().await;
        self.sync();
    }

    pub async fn login(&self, email: &str, password: &str, kind: UserKind) -> Result<&'static str, AuthError> {
        let result = self.session().login(email, password, kind).await;
        self.sync();
        result
    }

    pub async fn logout(&self) -> &'static str {
        let destination = self.session().logout().await;
        self.sync();
        destination
    }

    pub async fn refresh(&self) -> Result<(), AuthError> {
        let result = self.session().refresh().await;
        self.sync();
        result
    }

    pub async fn complete_sso(&self, query: &str) -> Result<String, CallbackError> {
        let result = self.session().complete_sso(query).await;
        self.sync();
        result
    }

    pub fn apply_profile(&self, patch: IdentityPatch) {
        self.session().apply_profile(patch);
        self.sync();
    }

    /// Route a failure from a call sent with `token` through the session.
    /// Returns true when a 401 ended the session; the route guard then sends
    /// the user to sign in. A 401 for an older token is ignored.
    pub fn handle_error(&self, error: &ApiError, token: &str) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        let session = self.session();
        if session.state().token() != Some(token) {
            log::debug!("auth: ignoring 401 for a superseded token");
            return false;
        }
        let redirect = session.handle_unauthorized(error, token, &current_path());
        self.sync();
        log::debug!("auth: session dropped after 401 (redirect {redirect:?})");
        true
    }

    /// Run an authenticated API call with the current token.
    ///
    /// A 401 from the call ends the session. Without a session the call is
    /// not attempted and fails as unauthorized.
    pub async fn call<R, F, Fut>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(Rc<BrowserSession>, String) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let session = self.session();
        let Some((_, token)) = session.credentials() else {
            return Err(ApiError::Unauthorized { message: None });
        };
        let result = f(session, token.clone()).await;
        if let Err(e) = &result {
            self.handle_error(e, &token);
        }
        result
    }
}

/// Provides the auth context and runs the startup session check once on mount.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let auth = AuthContext::new(browser_session(&config::load(), AuthState::loading()));
    provide_context(auth);

    spawn_local(async move {
        auth.initialize().await;
    });

    view! { {children()} }
}

/// The provided auth context, or a signed-out fallback outside `AuthProvider`.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .unwrap_or_else(|| AuthContext::new(browser_session(&ApiConfig::default(), AuthState::signed_out())))
}
