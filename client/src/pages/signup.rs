//! Account creation for individuals (with a guardian step for minors) and
//! fiduciary organizations.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use portal::forms::{FieldError, FiduciarySignupForm, UserSignupForm};
use portal::{ApiError, UserKind};

use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, TextField};
use crate::pages::login::kind_label;
use crate::state::auth::{AuthContext, use_auth};

const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

#[derive(Clone, Copy)]
struct Submission {
    errors: RwSignal<Vec<FieldError>>,
    busy: RwSignal<bool>,
    flash: Flash,
    done: RwSignal<bool>,
}

impl Submission {
    fn new() -> Self {
        Self {
            errors: RwSignal::new(Vec::new()),
            busy: RwSignal::new(false),
            flash: RwSignal::new(None),
            done: RwSignal::new(false),
        }
    }

    /// Validate, then run `send` once. Field errors stay on the form.
    fn submit<P, F, Fut>(self, auth: AuthContext, validated: Result<P, Vec<FieldError>>, send: F)
    where
        P: 'static,
        F: FnOnce(AuthContext, P) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<(), ApiError>> + 'static,
    {
        if self.busy.get_untracked() {
            return;
        }
        let payload = match validated {
            Ok(payload) => payload,
            Err(e) => {
                self.errors.set(e);
                return;
            }
        };
        self.errors.set(Vec::new());
        self.flash.set(None);
        self.busy.set(true);
        spawn_local(async move {
            match send(auth, payload).await {
                Ok(()) => self.done.set(true),
                Err(e) => self.flash.set(Some((AlertKind::Error, e.user_message(SIGNUP_FAILED)))),
            }
            self.busy.set(false);
        });
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let kind = RwSignal::new(UserKind::Individual);

    let tab = move |option: UserKind| {
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
            <div class="auth-card auth-card--wide">
                <h1>"Create an account"</h1>
                <div class="segmented">{tab(UserKind::Individual)} {tab(UserKind::Fiduciary)}</div>
                {move || match kind.get() {
                    UserKind::Individual => view! { <UserSignup /> }.into_any(),
                    UserKind::Fiduciary => view! { <FiduciarySignup /> }.into_any(),
                }}
                <div class="auth-card__links">
                    <A href="/login">"Already have an account? Sign in"</A>
                </div>
            </div>
        </div>
    }
}

#[component]
fn SignupDone() -> impl IntoView {
    view! {
        <Alert kind=AlertKind::Success message="Account created. You can now sign in.".to_owned() />
        <A href="/login" {..} class="button">"Go to sign in"</A>
    }
}

#[component]
fn UserSignup() -> impl IntoView {
    let auth = use_auth();
    let form = Submission::new();
    let errors = form.errors;

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let age = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let guardian_name = RwSignal::new(String::new());
    let guardian_email = RwSignal::new(String::new());
    let relationship = RwSignal::new(String::new());

    let current = move || UserSignupForm {
        first_name: first_name.get_untracked(),
        last_name: last_name.get_untracked(),
        email: email.get_untracked(),
        phone: phone.get_untracked(),
        age: age.get_untracked(),
        password: password.get_untracked(),
        confirm_password: confirm.get_untracked(),
        guardian_name: guardian_name.get_untracked(),
        guardian_email: guardian_email.get_untracked(),
        relationship: relationship.get_untracked(),
    };
    let is_minor = move || UserSignupForm { age: age.get(), ..UserSignupForm::default() }.is_minor();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        form.submit(auth, current().validate(), |auth, payload| async move {
            auth.session().api().signup_user(&payload).await
        });
    };

    view! {
        <Show when=move || !form.done.get() fallback=|| view! { <SignupDone /> }>
            <FlashBanner flash=form.flash />
            <form class="auth-form" on:submit=on_submit>
                <div class="form-row">
                    <TextField label="First name" field="firstName" value=first_name errors=errors />
                    <TextField label="Last name" field="lastName" value=last_name errors=errors />
                </div>
                <TextField label="Email" field="email" input_type="email" value=email errors=errors />
                <TextField label="Phone (optional)" field="phone" input_type="tel" value=phone errors=errors />
                <TextField label="Age" field="age" input_type="number" value=age errors=errors />
                <TextField label="Password" field="password" input_type="password" value=password errors=errors />
                <TextField
                    label="Confirm password"
                    field="confirmPassword"
                    input_type="password"
                    value=confirm
                    errors=errors
                />
                <Show when=is_minor>
                    <fieldset class="form-section">
                        <legend>"Guardian details"</legend>
                        <p class="form-section__hint">"Users under 18 need a parent or guardian's consent."</p>
                        <TextField label="Guardian name" field="guardianName" value=guardian_name errors=errors />
                        <TextField
                            label="Guardian email"
                            field="guardianEmail"
                            input_type="email"
                            value=guardian_email
                            errors=errors
                        />
                        <TextField label="Relationship" field="relationship" value=relationship errors=errors />
                    </fieldset>
                </Show>
                <button class="button" type="submit" disabled=move || form.busy.get()>
                    "Create account"
                </button>
            </form>
        </Show>
    }
}

#[component]
fn FiduciarySignup() -> impl IntoView {
    let auth = use_auth();
    let form = Submission::new();
    let errors = form.errors;

    let organization_name = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let validated = FiduciarySignupForm {
            organization_name: organization_name.get_untracked(),
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        }
        .validate();
        form.submit(auth, validated, |auth, payload| async move {
            auth.session().api().signup_fiduciary(&payload).await
        });
    };

    view! {
        <Show when=move || !form.done.get() fallback=|| view! { <SignupDone /> }>
            <FlashBanner flash=form.flash />
            <form class="auth-form" on:submit=on_submit>
                <TextField label="Organization name" field="organizationName" value=organization_name errors=errors />
                <TextField label="Your name" field="name" value=name errors=errors />
                <TextField label="Work email" field="email" input_type="email" value=email errors=errors />
                <TextField label="Phone (optional)" field="phone" input_type="tel" value=phone errors=errors />
                <TextField label="Password" field="password" input_type="password" value=password errors=errors />
                <TextField
                    label="Confirm password"
                    field="confirmPassword"
                    input_type="password"
                    value=confirm
                    errors=errors
                />
                <button class="button" type="submit" disabled=move || form.busy.get()>
                    "Register organization"
                </button>
            </form>
        </Show>
    }
}
