//! Processing purposes: list, create, edit and delete.

#[cfg(test)]
#[path = "purposes_test.rs"]
mod purposes_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::types::{Purpose, PurposeInput, PurposeStatus};

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, Spinner};
use crate::state::auth::use_auth;
use crate::util::format::{
    LEGAL_BASES, badge_class, legal_basis_label, legal_basis_value, parse_legal_basis, purpose_status_label,
};

const STATUSES: [PurposeStatus; 4] =
    [PurposeStatus::Active, PurposeStatus::Draft, PurposeStatus::Inactive, PurposeStatus::Archived];

fn status_value(status: PurposeStatus) -> &'static str {
    match status {
        PurposeStatus::Active => "active",
        PurposeStatus::Inactive => "inactive",
        PurposeStatus::Draft => "draft",
        PurposeStatus::Archived => "archived",
        PurposeStatus::Unknown => "",
    }
}

fn parse_status(value: &str) -> PurposeStatus {
    STATUSES.into_iter().find(|s| status_value(*s) == value).unwrap_or(PurposeStatus::Draft)
}

/// Editor contents as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PurposeDraft {
    pub name: String,
    pub description: String,
    pub legal_basis: String,
    pub retention_period: String,
    pub status: String,
}

impl PurposeDraft {
    pub fn from_purpose(purpose: &Purpose) -> Self {
        Self {
            name: purpose.name.clone(),
            description: purpose.description.clone(),
            legal_basis: legal_basis_value(purpose.legal_basis),
            retention_period: purpose.retention_period.clone(),
            status: status_value(purpose.status).to_owned(),
        }
    }

    pub fn to_input(&self) -> Result<PurposeInput, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Purpose name is required");
        }
        let legal_basis = parse_legal_basis(&self.legal_basis);
        if legal_basis == portal::types::LegalBasis::Unknown {
            return Err("Select a legal basis");
        }
        Ok(PurposeInput {
            name: name.to_owned(),
            description: self.description.trim().to_owned(),
            legal_basis,
            retention_period: self.retention_period.trim().to_owned(),
            status: parse_status(&self.status),
        })
    }
}

#[component]
pub fn PurposesPage() -> impl IntoView {
    let auth = use_auth();
    let purposes = LocalResource::new(move || async move {
        auth.call(|s, token| async move { s.api().list_purposes(&token).await }).await
    });

    let draft = RwSignal::new(PurposeDraft::default());
    // `Some(None)` while creating, `Some(Some(id))` while editing.
    let editing = RwSignal::new(None::<Option<String>>);
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let open_new = move |_| {
        draft.set(PurposeDraft { status: "draft".to_owned(), ..PurposeDraft::default() });
        editing.set(Some(None));
    };
    let open_edit = move |purpose: &Purpose| {
        draft.set(PurposeDraft::from_purpose(purpose));
        editing.set(Some(Some(purpose.id.clone())));
    };

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = match draft.with_untracked(PurposeDraft::to_input) {
            Ok(input) => input,
            Err(message) => {
                flash.set(Some((AlertKind::Error, message.to_owned())));
                return;
            }
        };
        let target = editing.get_untracked().flatten();
        busy.set(true);
        spawn_local(async move {
            let result = auth
                .call(|s, token| async move {
                    match target {
                        Some(id) => s.api().update_purpose(&token, &id, &input).await,
                        None => s.api().create_purpose(&token, &input).await,
                    }
                })
                .await;
            match result {
                Ok(()) => {
                    editing.set(None);
                    flash.set(Some((AlertKind::Success, "Purpose saved".to_owned())));
                    purposes.refetch();
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to save purpose")))),
            }
            busy.set(false);
        });
    };

    let on_delete = move |id: String| {
        spawn_local(async move {
            match auth.call(|s, token| async move { s.api().delete_purpose(&token, &id).await }).await {
                Ok(()) => purposes.refetch(),
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to delete purpose")))),
            }
        });
    };

    view! {
        <DashboardLayout title="Purposes">
            <div class="toolbar">
                <button class="button" type="button" on:click=open_new>"New purpose"</button>
            </div>
            <FlashBanner flash=flash />
            <Show when=move || editing.with(Option::is_some)>
                <form class="card editor" on:submit=on_save>
                    <label class="form-field">
                        <span class="form-field__label">"Name"</span>
                        <input
                            class="form-field__input"
                            prop:value=move || draft.with(|d| d.name.clone())
                            on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                        />
                    </label>
                    <label class="form-field">
                        <span class="form-field__label">"Description"</span>
                        <textarea
                            class="form-field__input"
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                        ></textarea>
                    </label>
                    <label class="form-field">
                        <span class="form-field__label">"Legal basis"</span>
                        <select
                            class="form-field__input"
                            prop:value=move || draft.with(|d| d.legal_basis.clone())
                            on:change=move |ev| draft.update(|d| d.legal_basis = event_target_value(&ev))
                        >
                            <option value="">"Select..."</option>
                            {LEGAL_BASES
                                .into_iter()
                                .map(|b| view! { <option value=legal_basis_value(b)>{legal_basis_label(b)}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="form-field">
                        <span class="form-field__label">"Retention period"</span>
                        <input
                            class="form-field__input"
                            placeholder="e.g. 2 years"
                            prop:value=move || draft.with(|d| d.retention_period.clone())
                            on:input=move |ev| draft.update(|d| d.retention_period = event_target_value(&ev))
                        />
                    </label>
                    <label class="form-field">
                        <span class="form-field__label">"Status"</span>
                        <select
                            class="form-field__input"
                            prop:value=move || draft.with(|d| d.status.clone())
                            on:change=move |ev| draft.update(|d| d.status = event_target_value(&ev))
                        >
                            {STATUSES
                                .into_iter()
                                .map(|s| view! { <option value=status_value(s)>{purpose_status_label(s)}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <div class="editor__actions">
                        <button class="button" type="submit" disabled=move || busy.get()>"Save"</button>
                        <button class="button button--secondary" type="button" on:click=move |_| editing.set(None)>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match purposes.get() {
                    Some(Ok(list)) if list.is_empty() => view! { <p class="empty">"No purposes yet."</p> }.into_any(),
                    Some(Ok(list)) => view! {
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Legal basis"</th>
                                    <th>"Retention"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || list.clone()
                                    key=|p| p.id.clone()
                                    children=move |p| {
                                        let label = purpose_status_label(p.status);
                                        let id = p.id.clone();
                                        let for_edit = p.clone();
                                        view! {
                                            <tr>
                                                <td>{p.name}</td>
                                                <td>{legal_basis_label(p.legal_basis)}</td>
                                                <td>{p.retention_period}</td>
                                                <td><span class=badge_class(label)>{label}</span></td>
                                                <td class="table__actions">
                                                    <button class="link" type="button" on:click=move |_| open_edit(&for_edit)>
                                                        "Edit"
                                                    </button>
                                                    <button class="link link--danger" type="button" on:click=move |_| on_delete(id.clone())>
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    }
                    .into_any(),
                    Some(Err(e)) => view! {
                        <Alert kind=AlertKind::Error message=e.user_message("Failed to load purposes") />
                    }
                    .into_any(),
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </DashboardLayout>
    }
}
