//! Post-signup onboarding: organization details for fiduciaries, profile
//! details for individuals.
//!
//! A successful submit re-fetches the identity so the route guard sees the
//! completed step before navigating to the landing page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use portal::forms::{FieldError, OrganizationForm, ProfileForm};
use portal::guard::paths;
use portal::ApiError;

use crate::components::ui::{AlertKind, Flash, FlashBanner, TextField};
use crate::state::auth::{AuthContext, use_auth};

const RELOAD_FAILED: &str = "Your details were saved, but your profile could not be reloaded. Please refresh.";

/// Shared submit tail: reload the identity, then go to its landing page.
async fn finish(auth: AuthContext, result: Result<(), ApiError>, flash: Flash, fallback: &'static str) -> Option<&'static str> {
    if let Err(e) = result {
        if !e.is_unauthorized() {
            flash.set(Some((AlertKind::Error, e.user_message(fallback))));
        }
        return None;
    }
    if let Err(e) = auth.refresh().await {
        log::warn!("onboarding: identity reload failed: {e}");
        flash.set(Some((AlertKind::Error, RELOAD_FAILED.to_owned())));
        return None;
    }
    Some(auth.state.with_untracked(|s| s.identity().map_or(paths::LOGIN, portal::Identity::landing_path)))
}

#[component]
pub fn OrganizationOnboardingPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let organization_name = RwSignal::new(String::new());
    let industry = RwSignal::new(String::new());
    let company_size = RwSignal::new(String::new());
    let tax_id = RwSignal::new(String::new());
    let website = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let country = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = OrganizationForm {
            organization_name: organization_name.get_untracked(),
            industry: industry.get_untracked(),
            company_size: company_size.get_untracked(),
            tax_id: tax_id.get_untracked(),
            website: website.get_untracked(),
            address: address.get_untracked(),
            country: country.get_untracked(),
        };
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        flash.set(None);
        busy.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = auth.call(|s, token| async move { s.api().onboard_organization(&token, &payload).await }).await;
            let destination = finish(auth, result, flash, "Failed to complete onboarding").await;
            busy.set(false);
            if let Some(destination) = destination {
                navigate(destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card auth-card--wide">
                <h1>"Set up your organization"</h1>
                <p class="auth-card__subtitle">"Tell us about the organization processing personal data."</p>
                <FlashBanner flash=flash />
                <form class="auth-form" on:submit=on_submit>
                    <TextField label="Organization name" field="organizationName" value=organization_name errors=errors />
                    <TextField label="Industry" field="industry" value=industry errors=errors />
                    <TextField label="Company size" field="companySize" placeholder="e.g. 51-200" value=company_size errors=errors />
                    <TextField label="Tax ID (optional)" field="taxId" value=tax_id errors=errors />
                    <TextField label="Website (optional)" field="website" input_type="url" value=website errors=errors />
                    <TextField label="Address" field="address" value=address errors=errors />
                    <TextField label="Country" field="country" value=country errors=errors />
                    <button class="button" type="submit" disabled=move || busy.get()>
                        "Complete setup"
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn ProfileOnboardingPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let age = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let guardian_email = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let is_minor = move || age.with(|a| a.trim().parse::<u32>().is_ok_and(|n| (1..portal::forms::ADULT_AGE).contains(&n)));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = ProfileForm {
            age: age.get_untracked(),
            location: location.get_untracked(),
            guardian_email: guardian_email.get_untracked(),
        };
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        flash.set(None);
        busy.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = auth.call(|s, token| async move { s.api().onboard_profile(&token, &payload).await }).await;
            let destination = finish(auth, result, flash, "Failed to complete profile").await;
            busy.set(false);
            if let Some(destination) = destination {
                navigate(destination, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Complete your profile"</h1>
                <FlashBanner flash=flash />
                <form class="auth-form" on:submit=on_submit>
                    <TextField label="Age" field="age" input_type="number" value=age errors=errors />
                    <TextField label="Location" field="location" value=location errors=errors />
                    <Show when=is_minor>
                        <TextField
                            label="Guardian email"
                            field="guardianEmail"
                            input_type="email"
                            value=guardian_email
                            errors=errors
                        />
                    </Show>
                    <button class="button" type="submit" disabled=move || busy.get()>
                        "Continue"
                    </button>
                </form>
            </div>
        </div>
    }
}
