//! Session controller.
//!
//! DESIGN
//! ======
//! One controller per tab owns the auth state and mirrors the bearer token
//! and account kind into [`Storage`]. Storage and transport are injected so
//! every test builds an isolated instance.
//!
//! STATE
//! =====
//! `AuthState.session` is `Some` exactly when a token is held, so the
//! "token iff identity" rule is structural. `kind` lives on the identity and
//! profile merges never touch it.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded. State sits in a `RefCell`; no borrow is held across an
//! `.await`, so overlapping user actions cannot panic. After an await the
//! controller re-checks that the session it started with is still current
//! before merging a result.

use std::cell::RefCell;

use crate::api::ApiClient;
use crate::error::{ApiError, AuthError};
use crate::guard::{self, paths};
use crate::sso::{self, CallbackError};
use crate::storage::{self, Persisted, Storage};
use crate::transport::Transport;
use crate::types::{Identity, IdentityPatch, LoginRequest, UserKind};

/// Shown when login fails without a server-supplied message.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
/// Shown when a persisted session could not be verified.
pub const SESSION_CHECK_FAILED: &str = "Failed to verify authentication";

/// An authenticated session: who, and the credential proving it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    /// True until the startup check resolves.
    pub loading: bool,
    pub session: Option<Session>,
    /// Last session-level error, suitable for display.
    pub error: Option<String>,
    /// The persisted session could not be verified (as opposed to never signed in).
    pub check_failed: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}

impl AuthState {
    /// Startup state: the persisted session has not been checked yet.
    pub fn loading() -> Self {
        Self { loading: true, session: None, error: None, check_failed: false }
    }

    pub fn signed_out() -> Self {
        Self { loading: false, ..Self::loading() }
    }

    pub fn signed_in(session: Session) -> Self {
        Self { loading: false, session: Some(session), error: None, check_failed: false }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn kind(&self) -> Option<UserKind> {
        self.identity().map(|i| i.kind)
    }
}

pub struct SessionController<S, T> {
    storage: S,
    api: ApiClient<T>,
    state: RefCell<AuthState>,
}

impl<S: Storage, T: Transport> SessionController<S, T> {
    /// Fresh controller in the loading state. Call [`Self::initialize`] next.
    pub fn new(storage: S, api: ApiClient<T>) -> Self {
        Self::with_state(storage, api, AuthState::loading())
    }

    /// Controller resuming from a previously observed state.
    pub fn with_state(storage: S, api: ApiClient<T>, state: AuthState) -> Self {
        Self { storage, api, state: RefCell::new(state) }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Kind and token of the current session.
    pub fn credentials(&self) -> Option<(UserKind, String)> {
        let state = self.state.borrow();
        state.session.as_ref().map(|s| (s.identity.kind, s.token.clone()))
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.state.borrow_mut());
    }

    fn replace(&self, next: AuthState) {
        *self.state.borrow_mut() = next;
    }

    fn holds_token(&self, token: &str) -> bool {
        self.state.borrow().token() == Some(token)
    }

    fn persisted_token(&self) -> Option<String> {
        match storage::load(&self.storage) {
            Persisted::Session { token, .. } => Some(token),
            Persisted::Empty | Persisted::Corrupt => None,
        }
    }

    // =============================================================
    // Lifecycle
    // =============================================================

    /// Restore the persisted session, verifying it with the backend.
    ///
    /// Never fails: problems end in the signed-out state, with `error` and
    /// `check_failed` set when a stored session was rejected. If storage
    /// changes hands while the check is in flight, the stale result is
    /// dropped. A session this controller already holds is kept; otherwise
    /// the check restarts against whatever storage now contains.
    pub async fn initialize(&self) {
        self.update(|s| {
            s.loading = true;
            s.error = None;
            s.check_failed = false;
        });

        loop {
            let (token, kind) = match storage::load(&self.storage) {
                Persisted::Empty => {
                    self.replace(AuthState::signed_out());
                    return;
                }
                Persisted::Corrupt => {
                    log::warn!("session: discarding persisted session with unknown account kind");
                    storage::clear(&self.storage);
                    self.replace(AuthState::signed_out());
                    return;
                }
                Persisted::Session { token, kind } => (token, kind),
            };

            let result = self.api.me(kind, &token).await;
            let current = self.persisted_token();
            if current.as_deref() != Some(token.as_str()) {
                if current.is_some_and(|t| self.holds_token(&t)) {
                    log::debug!("session: startup check superseded by a sign-in in this tab");
                    return;
                }
                log::debug!("session: stored session changed during startup check, re-checking");
                continue;
            }

            match result {
                Ok(snapshot) => {
                    let identity = snapshot.into_identity(kind, None);
                    log::info!("session: restored {kind} session");
                    self.replace(AuthState::signed_in(Session { identity, token }));
                }
                Err(e) => {
                    log::warn!("session: persisted session check failed: {e}");
                    storage::clear(&self.storage);
                    self.replace(AuthState {
                        loading: false,
                        session: None,
                        error: Some(e.user_message(SESSION_CHECK_FAILED)),
                        check_failed: true,
                    });
                }
            }
            return;
        }
    }

    /// Re-run the startup check after a failure.
    pub async fn retry(&self) {
        self.initialize().await;
    }

    /// Sign in and return the page to land on.
    ///
    /// On failure the state is left exactly as it was.
    pub async fn login(&self, email: &str, password: &str, kind: UserKind) -> Result<&'static str, AuthError> {
        let credentials = LoginRequest { email: email.trim().to_owned(), password: password.to_owned() };
        let response = self.api.login(kind, &credentials).await.map_err(|source| {
            log::warn!("session: {kind} login rejected: {source}");
            let message = source.user_message(LOGIN_FAILED);
            AuthError::Login { message, source }
        })?;

        if response.token.trim().is_empty() {
            log::warn!("session: {kind} login response carried no token");
            return Err(AuthError::MissingToken);
        }

        let token = response.token.clone();
        let identity = response.snapshot().into_identity(kind, Some(&credentials.email));
        let destination = identity.landing_path();

        storage::save(&self.storage, &token, kind);
        self.replace(AuthState::signed_in(Session { identity, token }));
        log::info!("session: signed in as {kind}");
        Ok(destination)
    }

    /// Sign out. The server call is best-effort; local state is always cleared.
    pub async fn logout(&self) -> &'static str {
        if let Some((kind, token)) = self.credentials() {
            if let Err(e) = self.api.logout(kind, &token).await {
                log::warn!("session: logout request failed: {e}");
            }
        }
        self.clear_local();
        paths::LOGIN
    }

    fn clear_local(&self) {
        storage::clear(&self.storage);
        self.replace(AuthState::signed_out());
    }

    // =============================================================
    // Profile
    // =============================================================

    /// Merge a partial identity update. No-op when signed out.
    pub fn apply_profile(&self, patch: IdentityPatch) {
        self.update(|s| {
            if let Some(session) = s.session.as_mut() {
                session.identity.apply(patch);
            }
        });
    }

    /// Re-fetch the current identity and merge it.
    ///
    /// A 401 signs the session out; other failures leave it untouched.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let (kind, token) = self.credentials().ok_or(AuthError::NotAuthenticated)?;
        match self.api.me(kind, &token).await {
            Ok(snapshot) => {
                if self.holds_token(&token) {
                    self.apply_profile(IdentityPatch::from(snapshot));
                }
                Ok(())
            }
            Err(e) => {
                if e.is_unauthorized() && self.holds_token(&token) {
                    self.clear_local();
                }
                Err(AuthError::Refresh(e))
            }
        }
    }

    /// React to a failed API call that was sent with `token`.
    ///
    /// A 401 clears the session and returns the login page to navigate to,
    /// unless `current_path` is already the login page. A 401 for a token
    /// this controller no longer holds is stale and ignored. Other errors are
    /// left to the caller.
    pub fn handle_unauthorized(&self, error: &ApiError, token: &str, current_path: &str) -> Option<&'static str> {
        if !error.is_unauthorized() {
            return None;
        }
        if !self.holds_token(token) {
            log::debug!("session: ignoring 401 for a superseded token");
            return None;
        }
        log::info!("session: server rejected the session token");
        self.clear_local();
        if guard::is_under(current_path, paths::LOGIN) { None } else { Some(paths::LOGIN) }
    }

    // =============================================================
    // SSO
    // =============================================================

    /// Establish a session from an SSO callback query and return the page to land on.
    ///
    /// The token is only trusted once the backend accepts it; the destination
    /// comes from the server's identity, or a validated `next` path.
    pub async fn complete_sso(&self, query: &str) -> Result<String, CallbackError> {
        let callback = sso::parse_callback(query).inspect_err(|e| log::warn!("session: sso callback rejected: {e}"))?;
        let kind = callback.kind;

        storage::save(&self.storage, &callback.token, kind);
        match self.api.me(kind, &callback.token).await {
            Ok(snapshot) => {
                let identity = snapshot.into_identity(kind, Some(&callback.claims.email));
                let destination = callback.next.unwrap_or_else(|| identity.landing_path().to_owned());
                self.replace(AuthState::signed_in(Session { identity, token: callback.token }));
                log::info!("session: signed in as {kind} via sso");
                Ok(destination)
            }
            Err(e) => {
                log::warn!("session: sso token verification failed: {e}");
                self.clear_local();
                Err(CallbackError::Verification(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
