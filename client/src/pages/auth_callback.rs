//! `/auth/callback`: finish an SSO sign-in.
//!
//! Success navigates to the landing page; any failure bounces to the login
//! page with an error code it knows how to display.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::ui::Spinner;
use crate::state::auth::use_auth;

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_location().search.get_untracked();

    spawn_local(async move {
        let destination = match auth.complete_sso(&query).await {
            Ok(destination) => destination,
            Err(e) => e.redirect_url(),
        };
        navigate(&destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    view! {
        <div class="page-loading">
            <Spinner />
            <p>"Completing sign-in..."</p>
        </div>
    }
}
