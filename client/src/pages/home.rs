//! `/`: sends the visitor to the login page or their landing page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use portal::guard;

use crate::components::ui::Spinner;
use crate::state::auth::use_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if let Some(destination) = auth.state.with(guard::home_destination) {
            navigate(destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    view! {
        <div class="page-loading">
            <Spinner />
        </div>
    }
}
