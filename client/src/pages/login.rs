//! Sign-in page for both account kinds.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};
use portal::forms::{FieldError, LoginForm};
use portal::guard;
use portal::sso::login_notice;
use portal::UserKind;

use crate::components::ui::{AlertKind, Flash, FlashBanner, TextField};
use crate::state::auth::use_auth;

pub fn kind_label(kind: UserKind) -> &'static str {
    match kind {
        UserKind::Individual => "Individual",
        UserKind::Fiduciary => "Organization",
    }
}

/// Banner for the page as first rendered: a failed SSO redirect wins over a
/// failed startup session check.
pub fn initial_notice(query: &str, session_error: Option<&str>) -> Option<(AlertKind, String)> {
    login_notice(query)
        .map(|m| (AlertKind::Error, m))
        .or_else(|| session_error.map(|m| (AlertKind::Error, m.to_owned())))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let location = use_location();

    let kind = RwSignal::new(UserKind::Individual);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    flash.set(auth.state.with_untracked(|s| {
        initial_notice(&location.search.get_untracked(), s.error.as_deref())
    }));

    // Already signed in: leave for the landing page.
    let navigate_home = navigate.clone();
    Effect::new(move |_| {
        let destination = auth.state.with(|s| s.is_authenticated().then(|| guard::home_destination(s)).flatten());
        if let Some(destination) = destination {
            navigate_home(destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let check_failed = move || auth.state.with(|s| s.check_failed);
    let on_retry = move |_| {
        flash.set(None);
        spawn_local(async move { auth.retry().await });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = LoginForm { email: email.get_untracked(), password: password.get_untracked() };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        flash.set(None);
        busy.set(true);
        let navigate = navigate.clone();
        let selected = kind.get_untracked();
        spawn_local(async move {
            match auth.login(&request.email, &request.password, selected).await {
                Ok(destination) => navigate(destination, NavigateOptions::default()),
                Err(e) => flash.set(Some((AlertKind::Error, e.to_string()))),
            }
            busy.set(false);
        });
    };

    let kind_button = move |option: UserKind| {
        view! {
            <button
                type="button"
                class=move || if kind.get() == option { "segmented__option segmented__option--active" } else { "segmented__option" }
                on:click=move |_| kind.set(option)
            >
                {kind_label(option)}
            </button>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <p class="auth-card__subtitle">"Manage consent and data rights"</p>
                <div class="segmented">
                    {kind_button(UserKind::Individual)}
                    {kind_button(UserKind::Fiduciary)}
                </div>
                <FlashBanner flash=flash />
                <Show when=check_failed>
                    <button class="button button--secondary" type="button" on:click=on_retry>
                        "Retry"
                    </button>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <TextField label="Email" field="email" input_type="email" value=email errors=errors />
                    <TextField label="Password" field="password" input_type="password" value=password errors=errors />
                    <button class="button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <div class="auth-card__links">
                    <A href="/forgot-password">"Forgot password?"</A>
                    <A href="/signup">"Create an account"</A>
                </div>
            </div>
        </div>
    }
}
