//! Route wrapper enforcing sign-in, onboarding and account kind.
//!
//! Decisions come from `portal::guard::decide`; this component only
//! performs the navigation and picks what to render meanwhile.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use portal::guard::{self, GuardDecision};
use portal::UserKind;

use crate::components::ui::{AccessDenied, Spinner};
use crate::state::auth::use_auth;

#[component]
pub fn ProtectedRoute(#[prop(optional)] required_kind: Option<UserKind>, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let path = location.pathname.get();
        auth.state.with(|state| guard::decide(state, &path, required_kind))
    });

    Effect::new(move |_| {
        if let GuardDecision::Redirect(to) = decision.get() {
            navigate(to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decision.get() {
        GuardDecision::Allow => children().into_any(),
        GuardDecision::Deny => view! { <AccessDenied /> }.into_any(),
        GuardDecision::Pending | GuardDecision::Redirect(_) => view! {
            <div class="page-loading">
                <Spinner />
            </div>
        }
        .into_any(),
    }
}
