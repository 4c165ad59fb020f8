//! Small presentational components shared by pages.

use leptos::prelude::*;
use leptos_router::components::A;
use portal::forms::{FieldError, error_for};
use portal::guard::paths;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
    Info,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            Self::Error => "alert alert--error",
            Self::Success => "alert alert--success",
            Self::Info => "alert alert--info",
        }
    }
}

/// Page-level message slot: `None` hides the banner.
pub type Flash = RwSignal<Option<(AlertKind, String)>>;

/// Messages must be safe to render; never pass tokens.
#[component]
pub fn Alert(kind: AlertKind, message: String) -> impl IntoView {
    view! { <div class=kind.class() role="alert">{message}</div> }
}

#[component]
pub fn FlashBanner(flash: Flash) -> impl IntoView {
    move || flash.get().map(|(kind, message)| view! { <Alert kind=kind message=message /> })
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <div class="spinner" role="status" aria-live="polite" aria-label="Loading"></div> }
}

/// Labelled input bound to `value`, showing the first validation error for `field`.
#[component]
pub fn TextField(
    label: &'static str,
    field: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<Vec<FieldError>>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    let error = move || errors.with(|e| error_for(e, field));
    view! {
        <label class="form-field">
            <span class="form-field__label">{label}</span>
            <input
                class=move || {
                    if error().is_some() { "form-field__input form-field__input--invalid" } else { "form-field__input" }
                }
                name=field
                type=input_type
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <Show when=move || error().is_some()>
                <span class="form-field__error">{move || error().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}

#[component]
pub fn AccessDenied() -> impl IntoView {
    view! {
        <div class="access-denied">
            <h1>"Access denied"</h1>
            <p>"Your account type cannot open this page."</p>
            <A href=paths::DASHBOARD>"Back to dashboard"</A>
        </div>
    }
}
