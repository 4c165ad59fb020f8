//! Consent forms: list, compose from purposes, publish, archive and delete.

#[cfg(test)]
#[path = "consent_forms_test.rs"]
mod consent_forms_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::types::{ConsentForm, ConsentFormInput, ConsentFormStatus, Purpose};
use portal::ApiError;

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, Spinner};
use crate::state::auth::use_auth;
use crate::util::format::{badge_class, consent_form_status_label, short_date};

/// Purpose names for a form, in the form's order; unknown ids are shown as-is.
pub fn purpose_names(form: &ConsentForm, purposes: &[Purpose]) -> Vec<String> {
    form.purpose_ids
        .iter()
        .map(|id| purposes.iter().find(|p| &p.id == id).map_or_else(|| id.clone(), |p| p.name.clone()))
        .collect()
}

/// Toggle `id` in the selection, keeping insertion order.
pub fn toggle(selected: &mut Vec<String>, id: &str) {
    if let Some(pos) = selected.iter().position(|s| s == id) {
        selected.remove(pos);
    } else {
        selected.push(id.to_owned());
    }
}

pub fn new_form_input(name: &str, purpose_ids: Vec<String>) -> Result<ConsentFormInput, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Form name is required");
    }
    if purpose_ids.is_empty() {
        return Err("Select at least one purpose");
    }
    Ok(ConsentFormInput { name: name.to_owned(), purpose_ids, status: ConsentFormStatus::Draft })
}

#[component]
pub fn ConsentFormsPage() -> impl IntoView {
    let auth = use_auth();
    let data = LocalResource::new(move || async move {
        auth.call(|s, token| async move {
            let forms = s.api().list_consent_forms(&token).await?;
            let purposes = s.api().list_purposes(&token).await?;
            Ok::<_, ApiError>((forms, purposes))
        })
        .await
    });

    let creating = RwSignal::new(false);
    let name = RwSignal::new(String::new());
    let selected = RwSignal::new(Vec::<String>::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = match new_form_input(&name.get_untracked(), selected.get_untracked()) {
            Ok(input) => input,
            Err(message) => {
                flash.set(Some((AlertKind::Error, message.to_owned())));
                return;
            }
        };
        busy.set(true);
        spawn_local(async move {
            match auth.call(|s, token| async move { s.api().create_consent_form(&token, &input).await }).await {
                Ok(()) => {
                    creating.set(false);
                    name.set(String::new());
                    selected.set(Vec::new());
                    flash.set(Some((AlertKind::Success, "Consent form created".to_owned())));
                    data.refetch();
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to create consent form")))),
            }
            busy.set(false);
        });
    };

    // Re-read the form before writing so concurrent edits to other fields survive.
    let set_status = move |id: String, status: ConsentFormStatus| {
        spawn_local(async move {
            let result = auth
                .call(|s, token| async move {
                    let current = s.api().get_consent_form(&token, &id).await?;
                    let input = ConsentFormInput { name: current.name, purpose_ids: current.purpose_ids, status };
                    s.api().update_consent_form(&token, &id, &input).await
                })
                .await;
            match result {
                Ok(()) => data.refetch(),
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to update consent form")))),
            }
        });
    };

    let on_delete = move |id: String| {
        spawn_local(async move {
            match auth.call(|s, token| async move { s.api().delete_consent_form(&token, &id).await }).await {
                Ok(()) => data.refetch(),
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to delete consent form")))),
            }
        });
    };

    view! {
        <DashboardLayout title="Consent forms">
            <div class="toolbar">
                <button class="button" type="button" on:click=move |_| creating.update(|c| *c = !*c)>
                    "New consent form"
                </button>
            </div>
            <FlashBanner flash=flash />
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match data.get() {
                    Some(Ok((forms, purposes))) => {
                        let picker_purposes = purposes.clone();
                        view! {
                            <Show when=move || creating.get()>
                                <form class="card editor" on:submit=on_create>
                                    <label class="form-field">
                                        <span class="form-field__label">"Name"</span>
                                        <input
                                            class="form-field__input"
                                            prop:value=move || name.get()
                                            on:input=move |ev| name.set(event_target_value(&ev))
                                        />
                                    </label>
                                    <fieldset class="form-section">
                                        <legend>"Purposes"</legend>
                                        {picker_purposes
                                            .iter()
                                            .map(|p| {
                                                let id = p.id.clone();
                                                let checked_id = p.id.clone();
                                                view! {
                                                    <label class="checkbox">
                                                        <input
                                                            type="checkbox"
                                                            prop:checked=move || selected.with(|s| s.contains(&checked_id))
                                                            on:change=move |_| selected.update(|s| toggle(s, &id))
                                                        />
                                                        {p.name.clone()}
                                                    </label>
                                                }
                                            })
                                            .collect_view()}
                                    </fieldset>
                                    <div class="editor__actions">
                                        <button class="button" type="submit" disabled=move || busy.get()>"Create"</button>
                                    </div>
                                </form>
                            </Show>
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Name"</th>
                                        <th>"Purposes"</th>
                                        <th>"Version"</th>
                                        <th>"Status"</th>
                                        <th>"Updated"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {forms
                                        .into_iter()
                                        .map(|f| {
                                            let label = consent_form_status_label(f.status);
                                            let names = purpose_names(&f, &purposes).join(", ");
                                            let publish_id = f.id.clone();
                                            let archive_id = f.id.clone();
                                            let delete_id = f.id.clone();
                                            let published = f.status == ConsentFormStatus::Published;
                                            view! {
                                                <tr>
                                                    <td>{f.name}</td>
                                                    <td>{names}</td>
                                                    <td>{f.version}</td>
                                                    <td><span class=badge_class(label)>{label}</span></td>
                                                    <td>{short_date(&f.last_updated).to_owned()}</td>
                                                    <td class="table__actions">
                                                        <Show when=move || !published>
                                                            <button
                                                                class="link"
                                                                type="button"
                                                                on:click={
                                                                    let id = publish_id.clone();
                                                                    move |_| set_status(id.clone(), ConsentFormStatus::Published)
                                                                }
                                                            >
                                                                "Publish"
                                                            </button>
                                                        </Show>
                                                        <button
                                                            class="link"
                                                            type="button"
                                                            on:click=move |_| set_status(archive_id.clone(), ConsentFormStatus::Archived)
                                                        >
                                                            "Archive"
                                                        </button>
                                                        <button
                                                            class="link link--danger"
                                                            type="button"
                                                            on:click=move |_| on_delete(delete_id.clone())
                                                        >
                                                            "Delete"
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        }
                        .into_any()
                    }
                    Some(Err(e)) => view! {
                        <Alert kind=AlertKind::Error message=e.user_message("Failed to load consent forms") />
                    }
                    .into_any(),
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </DashboardLayout>
    }
}
