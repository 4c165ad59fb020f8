//! Data subject requests: review and move through the workflow with a note.

#[cfg(test)]
#[path = "dsr_test.rs"]
mod dsr_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::types::{DsrRequest, DsrStatus, DsrStatusNote};

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, Spinner};
use crate::state::auth::use_auth;
use crate::util::format::{badge_class, dsr_next_statuses, dsr_status_label, short_date};

/// Requests matching `status`, or all of them. Order is preserved.
pub fn filter_requests(requests: &[DsrRequest], status: Option<DsrStatus>) -> Vec<DsrRequest> {
    requests.iter().filter(|r| status.is_none_or(|s| r.status == s)).cloned().collect()
}

/// Body for a transition. Rejections must say why.
pub fn transition_note(status: DsrStatus, note: &str) -> Result<DsrStatusNote, &'static str> {
    let note = note.trim();
    if status == DsrStatus::Rejected && note.is_empty() {
        return Err("A note is required when rejecting a request");
    }
    Ok(DsrStatusNote { note: note.to_owned() })
}

const FILTERS: [(&str, Option<DsrStatus>); 5] = [
    ("All", None),
    ("Pending", Some(DsrStatus::Pending)),
    ("Processing", Some(DsrStatus::Processing)),
    ("Completed", Some(DsrStatus::Completed)),
    ("Rejected", Some(DsrStatus::Rejected)),
];

#[component]
pub fn DsrPage() -> impl IntoView {
    let auth = use_auth();
    let requests = LocalResource::new(move || async move {
        auth.call(|s, token| async move { s.api().list_dsr_requests(&token).await }).await
    });

    let filter = RwSignal::new(None::<DsrStatus>);
    let acting = RwSignal::new(None::<(String, DsrStatus)>);
    let note = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_confirm = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some((id, status)) = acting.get_untracked() else {
            return;
        };
        if busy.get_untracked() {
            return;
        }
        let body = match transition_note(status, &note.get_untracked()) {
            Ok(body) => body,
            Err(message) => {
                flash.set(Some((AlertKind::Error, message.to_owned())));
                return;
            }
        };
        busy.set(true);
        spawn_local(async move {
            let result = auth.call(|s, token| async move { s.api().transition_dsr(&token, &id, status, &body).await }).await;
            match result {
                Ok(()) => {
                    acting.set(None);
                    note.set(String::new());
                    flash.set(Some((AlertKind::Success, format!("Request marked {}", dsr_status_label(status)))));
                    requests.refetch();
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to update request")))),
            }
            busy.set(false);
        });
    };

    view! {
        <DashboardLayout title="Data requests">
            <div class="toolbar segmented">
                {FILTERS
                    .into_iter()
                    .map(|(label, value)| {
                        view! {
                            <button
                                type="button"
                                class=move || {
                                    if filter.get() == value { "segmented__option segmented__option--active" } else { "segmented__option" }
                                }
                                on:click=move |_| filter.set(value)
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <FlashBanner flash=flash />
            <Show when=move || acting.with(Option::is_some)>
                <form class="card editor" on:submit=on_confirm>
                    <p>
                        {move || {
                            acting.get().map(|(_, s)| format!("Mark request as {}", dsr_status_label(s))).unwrap_or_default()
                        }}
                    </p>
                    <label class="form-field">
                        <span class="form-field__label">"Note"</span>
                        <textarea
                            class="form-field__input"
                            prop:value=move || note.get()
                            on:input=move |ev| note.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                    <div class="editor__actions">
                        <button class="button" type="submit" disabled=move || busy.get()>"Confirm"</button>
                        <button class="button button--secondary" type="button" on:click=move |_| acting.set(None)>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match requests.get() {
                    Some(Ok(list)) => {
                        let visible = filter_requests(&list, filter.get());
                        if visible.is_empty() {
                            return view! { <p class="empty">"No requests."</p> }.into_any();
                        }
                        view! {
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Requester"</th>
                                        <th>"Type"</th>
                                        <th>"Submitted"</th>
                                        <th>"Deadline"</th>
                                        <th>"Status"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {visible
                                        .into_iter()
                                        .map(|r| {
                                            let label = dsr_status_label(r.status);
                                            let actions = dsr_next_statuses(r.status)
                                                .iter()
                                                .map(|next| {
                                                    let next = *next;
                                                    let id = r.id.clone();
                                                    view! {
                                                        <button
                                                            class="link"
                                                            type="button"
                                                            on:click=move |_| {
                                                                note.set(String::new());
                                                                acting.set(Some((id.clone(), next)));
                                                            }
                                                        >
                                                            {dsr_status_label(next)}
                                                        </button>
                                                    }
                                                })
                                                .collect_view();
                                            view! {
                                                <tr title=r.description>
                                                    <td>{r.user_name}</td>
                                                    <td>{r.request_type}</td>
                                                    <td>{short_date(&r.date_submitted).to_owned()}</td>
                                                    <td>{short_date(&r.deadline).to_owned()}</td>
                                                    <td><span class=badge_class(label)>{label}</span></td>
                                                    <td class="table__actions">{actions}</td>
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
                        <Alert kind=AlertKind::Error message=e.user_message("Failed to load data requests") />
                    }
                    .into_any(),
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </DashboardLayout>
    }
}
