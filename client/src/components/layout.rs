//! Dashboard shell: sidebar navigation, signed-in identity and logout.
//!
//! Fiduciary-only sections are listed only for fiduciary sessions; the route
//! guard still rejects direct visits from individuals.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use portal::UserKind;

use crate::state::auth::use_auth;

/// Sidebar entries `(href, label)` for a session of `kind`.
pub fn nav_links(kind: Option<UserKind>) -> Vec<(&'static str, &'static str)> {
    let mut links = vec![("/dashboard", "Overview")];
    if kind == Some(UserKind::Fiduciary) {
        links.extend([
            ("/dashboard/purposes", "Purposes"),
            ("/dashboard/consent-forms", "Consent forms"),
            ("/dashboard/dsr", "Data requests"),
            ("/dashboard/grievances", "Grievances"),
            ("/dashboard/audit", "Audit logs"),
        ]);
    }
    links.push(("/dashboard/profile", "Profile"));
    links
}

#[component]
pub fn DashboardLayout(title: &'static str, children: Children) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let signing_out = RwSignal::new(false);

    let display_name = move || auth.state.with(|s| s.identity().map(|i| i.name.clone()).unwrap_or_default());
    let links = move || nav_links(auth.state.with(portal::AuthState::kind));

    let on_logout = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let destination = auth.logout().await;
            signing_out.set(false);
            navigate(destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
        });
    };

    view! {
        <div class="dashboard-shell">
            <aside class="dashboard-shell__sidebar">
                <div class="dashboard-shell__brand">"Consent Portal"</div>
                <nav class="dashboard-shell__nav">
                    {move || {
                        links()
                            .into_iter()
                            .map(|(href, label)| view! { <A href=href>{label}</A> })
                            .collect_view()
                    }}
                </nav>
                <div class="dashboard-shell__account">
                    <span class="dashboard-shell__user">{display_name}</span>
                    <button
                        class="button button--secondary"
                        type="button"
                        disabled=move || signing_out.get()
                        on:click=on_logout
                    >
                        "Sign out"
                    </button>
                </div>
            </aside>
            <main class="dashboard-shell__content">
                <h1 class="dashboard-shell__title">{title}</h1>
                {children()}
            </main>
        </div>
    }
}
