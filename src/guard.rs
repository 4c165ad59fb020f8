//! Route guard.
//!
//! A pure decision over the auth state and the current path. The UI layer
//! performs any navigation; nothing here touches the router.

use crate::session::AuthState;
use crate::types::UserKind;

/// Application routes the session logic redirects to.
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
    pub const ONBOARDING: &str = "/onboarding";
    pub const ONBOARDING_ORGANIZATION: &str = "/onboarding/organization";
    pub const ONBOARDING_PROFILE: &str = "/onboarding/profile";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session check still running; render a neutral loading view.
    Pending,
    Allow,
    Redirect(&'static str),
    /// Signed in as the wrong kind for this page; render access denied.
    Deny,
}

/// Onboarding step required before a session of `kind` may use the dashboard.
pub fn onboarding_path(kind: UserKind) -> &'static str {
    match kind {
        UserKind::Fiduciary => paths::ONBOARDING_ORGANIZATION,
        UserKind::Individual => paths::ONBOARDING_PROFILE,
    }
}

/// Whether `path` is `base` itself or nested below it. Query and fragment are ignored.
pub fn is_under(path: &str, base: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    path == base || path.strip_prefix(base).is_some_and(|rest| rest.starts_with('/'))
}

/// Decide what a protected page should do. Rules apply in order:
///
/// 1. still initializing: `Pending`
/// 2. signed out: redirect to login
/// 3. onboarding incomplete off the onboarding pages: redirect to the step
/// 4. onboarding complete on an onboarding page: redirect to the dashboard
/// 5. wrong account kind for the page: `Deny`
pub fn decide(state: &AuthState, current_path: &str, required_kind: Option<UserKind>) -> GuardDecision {
    if state.loading {
        return GuardDecision::Pending;
    }
    let Some(session) = state.session.as_ref() else {
        return GuardDecision::Redirect(paths::LOGIN);
    };

    let identity = &session.identity;
    let on_onboarding = is_under(current_path, paths::ONBOARDING);
    match identity.pending_onboarding() {
        Some(step) if !on_onboarding => return GuardDecision::Redirect(step),
        None if on_onboarding => return GuardDecision::Redirect(paths::DASHBOARD),
        _ => {}
    }

    if required_kind.is_some_and(|kind| kind != identity.kind) {
        return GuardDecision::Deny;
    }
    GuardDecision::Allow
}

/// Where `/` should send the visitor once the session check has resolved.
pub fn home_destination(state: &AuthState) -> Option<&'static str> {
    if state.loading {
        return None;
    }
    Some(state.session.as_ref().map_or(paths::LOGIN, |s| s.identity.landing_path()))
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
