//! Request a password reset email.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use portal::forms::{FieldError, ForgotPasswordForm};

use crate::components::ui::{AlertKind, Flash, FlashBanner, TextField};
use crate::state::auth::use_auth;

/// Shown whether or not the address has an account.
pub const RESET_SENT: &str = "If an account exists for that email, a reset link is on its way.";

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let email = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let request = match (ForgotPasswordForm { email: email.get_untracked() }).validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        busy.set(true);
        spawn_local(async move {
            let result = auth.session().api().forgot_password(&request).await;
            match result {
                Ok(()) => flash.set(Some((AlertKind::Success, RESET_SENT.to_owned()))),
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to send reset email")))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Forgot password"</h1>
                <p class="auth-card__subtitle">"We'll email you a link to choose a new one."</p>
                <FlashBanner flash=flash />
                <form class="auth-form" on:submit=on_submit>
                    <TextField label="Email" field="email" input_type="email" value=email errors=errors />
                    <button class="button" type="submit" disabled=move || busy.get()>
                        "Send reset link"
                    </button>
                </form>
                <div class="auth-card__links">
                    <A href="/login">"Back to sign in"</A>
                </div>
            </div>
        </div>
    }
}
