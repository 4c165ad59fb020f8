//! Account profile: edit contact details and change password.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::forms::{ChangePasswordForm, FieldError, ProfileEditForm};
use portal::types::{IdentityPatch, IdentitySnapshot, ProfileUpdate};

use crate::components::layout::DashboardLayout;
use crate::components::ui::{AlertKind, Flash, FlashBanner, TextField};
use crate::state::auth::use_auth;

/// What to merge into the session after a successful save: the server's
/// echo when it sent one, otherwise the submitted fields.
pub fn saved_patch(update: &ProfileUpdate, echoed: Option<IdentitySnapshot>) -> IdentityPatch {
    echoed.map_or_else(
        || IdentityPatch {
            name: Some(update.name.clone()),
            email: Some(update.email.clone()),
            phone: update.phone.clone(),
            ..IdentityPatch::default()
        },
        IdentityPatch::from,
    )
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <DashboardLayout title="Profile">
            <div class="card-grid">
                <ProfileDetails />
                <ChangePassword />
            </div>
        </DashboardLayout>
    }
}

#[component]
fn ProfileDetails() -> impl IntoView {
    let auth = use_auth();
    let (name0, email0, phone0) = auth.state.with_untracked(|s| {
        s.identity().map_or_else(Default::default, |i| {
            (i.name.clone(), i.email.clone(), i.phone.clone().unwrap_or_default())
        })
    });
    let name = RwSignal::new(name0);
    let email = RwSignal::new(email0);
    let phone = RwSignal::new(phone0);
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = ProfileEditForm { name: name.get_untracked(), email: email.get_untracked(), phone: phone.get_untracked() };
        let update = match form.validate() {
            Ok(update) => update,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        let Some(kind) = auth.kind() else {
            return;
        };
        errors.set(Vec::new());
        busy.set(true);
        spawn_local(async move {
            let sent = update.clone();
            match auth.call(|s, token| async move { s.api().update_profile(kind, &token, &sent).await }).await {
                Ok(echoed) => {
                    auth.apply_profile(saved_patch(&update, echoed));
                    flash.set(Some((AlertKind::Success, "Profile updated".to_owned())));
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to update profile")))),
            }
            busy.set(false);
        });
    };

    view! {
        <form class="card" on:submit=on_submit>
            <h2>"Details"</h2>
            <FlashBanner flash=flash />
            <TextField label="Name" field="name" value=name errors=errors />
            <TextField label="Email" field="email" input_type="email" value=email errors=errors />
            <TextField label="Phone" field="phone" input_type="tel" value=phone errors=errors />
            <button class="button" type="submit" disabled=move || busy.get()>"Save changes"</button>
        </form>
    }
}

#[component]
fn ChangePassword() -> impl IntoView {
    let auth = use_auth();
    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = ChangePasswordForm {
            current_password: current.get_untracked(),
            new_password: new_password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        let change = match form.validate() {
            Ok(change) => change,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(Vec::new());
        busy.set(true);
        spawn_local(async move {
            match auth.call(|s, token| async move { s.api().change_password(&token, &change).await }).await {
                Ok(()) => {
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                    flash.set(Some((AlertKind::Success, "Password changed".to_owned())));
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to change password")))),
            }
            busy.set(false);
        });
    };

    view! {
        <form class="card" on:submit=on_submit>
            <h2>"Change password"</h2>
            <FlashBanner flash=flash />
            <TextField label="Current password" field="currentPassword" input_type="password" value=current errors=errors />
            <TextField label="New password" field="newPassword" input_type="password" value=new_password errors=errors />
            <TextField
                label="Confirm new password"
                field="confirmPassword"
                input_type="password"
                value=confirm
                errors=errors
            />
            <button class="button" type="submit" disabled=move || busy.get()>"Update password"</button>
        </form>
    }
}
