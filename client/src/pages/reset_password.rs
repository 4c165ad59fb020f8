//! Choose a new password using the token from the emailed link.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};
use portal::forms::{FieldError, ResetPasswordForm, error_for};

use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, TextField};
use crate::state::auth::use_auth;

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();

    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let token = move || query.with(|q| q.get("token")).unwrap_or_default();
    let token_error = move || errors.with(|e| error_for(e, "token"));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = ResetPasswordForm {
            token: query.with_untracked(|q| q.get("token")).unwrap_or_default(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        busy.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match auth.session().api().reset_password(&request).await {
                Ok(()) => {
                    log::info!("reset-password: password updated");
                    navigate("/login", NavigateOptions { replace: true, ..NavigateOptions::default() });
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to reset password")))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Reset password"</h1>
                <Show when=move || token().is_empty()>
                    <Alert kind=AlertKind::Error message="This password reset link is invalid or has expired".to_owned() />
                </Show>
                {move || token_error().map(|m| view! { <Alert kind=AlertKind::Error message=m.to_owned() /> })}
                <FlashBanner flash=flash />
                <form class="auth-form" on:submit=on_submit>
                    <TextField label="New password" field="password" input_type="password" value=password errors=errors />
                    <TextField
                        label="Confirm password"
                        field="confirmPassword"
                        input_type="password"
                        value=confirm
                        errors=errors
                    />
                    <button class="button" type="submit" disabled=move || busy.get()>
                        "Update password"
                    </button>
                </form>
                <div class="auth-card__links">
                    <A href="/forgot-password">"Request a new link"</A>
                </div>
            </div>
        </div>
    }
}
