//! Grievances raised by data principals: review, investigate and resolve.

#[cfg(test)]
#[path = "grievances_test.rs"]
mod grievances_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal::types::{Grievance, GrievanceStatus, GrievanceUpdate};

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Flash, FlashBanner, Spinner};
use crate::state::auth::use_auth;
use crate::util::format::{badge_class, grievance_status_label, short_date};

const STATUSES: [GrievanceStatus; 4] =
    [GrievanceStatus::Pending, GrievanceStatus::Investigating, GrievanceStatus::Resolved, GrievanceStatus::Closed];

fn status_value(status: GrievanceStatus) -> &'static str {
    match status {
        GrievanceStatus::Pending => "pending",
        GrievanceStatus::Investigating => "investigating",
        GrievanceStatus::Resolved => "resolved",
        GrievanceStatus::Closed => "closed",
        GrievanceStatus::Unknown => "",
    }
}

pub fn parse_status(value: &str) -> GrievanceStatus {
    STATUSES.into_iter().find(|s| status_value(*s) == value).unwrap_or(GrievanceStatus::Unknown)
}

/// Update body. Resolving or closing needs a resolution summary.
pub fn grievance_update(status: GrievanceStatus, resolution: &str) -> Result<GrievanceUpdate, &'static str> {
    if status == GrievanceStatus::Unknown {
        return Err("Select a status");
    }
    let resolution = resolution.trim();
    if matches!(status, GrievanceStatus::Resolved | GrievanceStatus::Closed) && resolution.is_empty() {
        return Err("Describe the resolution");
    }
    Ok(GrievanceUpdate { status, resolution: resolution.to_owned() })
}

/// Open grievances first, oldest submission first within each group.
pub fn triage_order(grievances: &mut [Grievance]) {
    grievances.sort_by(|a, b| {
        let open = |g: &Grievance| matches!(g.status, GrievanceStatus::Pending | GrievanceStatus::Investigating);
        open(b).cmp(&open(a)).then_with(|| a.date_submitted.cmp(&b.date_submitted))
    });
}

#[component]
pub fn GrievancesPage() -> impl IntoView {
    let auth = use_auth();
    let grievances = LocalResource::new(move || async move {
        auth.call(|s, token| async move { s.api().list_grievances(&token).await }).await
    });

    let editing = RwSignal::new(None::<String>);
    let status = RwSignal::new(String::new());
    let resolution = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let flash: Flash = RwSignal::new(None);

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = editing.get_untracked() else {
            return;
        };
        if busy.get_untracked() {
            return;
        }
        let update = match grievance_update(parse_status(&status.get_untracked()), &resolution.get_untracked()) {
            Ok(update) => update,
            Err(message) => {
                flash.set(Some((AlertKind::Error, message.to_owned())));
                return;
            }
        };
        busy.set(true);
        spawn_local(async move {
            match auth.call(|s, token| async move { s.api().update_grievance(&token, &id, &update).await }).await {
                Ok(()) => {
                    editing.set(None);
                    flash.set(Some((AlertKind::Success, "Grievance updated".to_owned())));
                    grievances.refetch();
                }
                Err(e) => flash.set(Some((AlertKind::Error, e.user_message("Failed to update grievance")))),
            }
            busy.set(false);
        });
    };

    view! {
        <DashboardLayout title="Grievances">
            <FlashBanner flash=flash />
            <Show when=move || editing.with(Option::is_some)>
                <form class="card editor" on:submit=on_save>
                    <label class="form-field">
                        <span class="form-field__label">"Status"</span>
                        <select
                            class="form-field__input"
                            prop:value=move || status.get()
                            on:change=move |ev| status.set(event_target_value(&ev))
                        >
                            {STATUSES
                                .into_iter()
                                .map(|s| view! { <option value=status_value(s)>{grievance_status_label(s)}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="form-field">
                        <span class="form-field__label">"Resolution"</span>
                        <textarea
                            class="form-field__input"
                            prop:value=move || resolution.get()
                            on:input=move |ev| resolution.set(event_target_value(&ev))
                        ></textarea>
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
                {move || match grievances.get() {
                    Some(Ok(mut list)) => {
                        if list.is_empty() {
                            return view! { <p class="empty">"No grievances."</p> }.into_any();
                        }
                        triage_order(&mut list);
                        view! {
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Type"</th>
                                        <th>"Description"</th>
                                        <th>"Submitted"</th>
                                        <th>"Resolved"</th>
                                        <th>"Status"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {list
                                        .into_iter()
                                        .map(|g| {
                                            let label = grievance_status_label(g.status);
                                            let current = status_value(g.status);
                                            let id = g.id.clone();
                                            view! {
                                                <tr>
                                                    <td>{g.grievance_type}</td>
                                                    <td>{g.description}</td>
                                                    <td>{short_date(&g.date_submitted).to_owned()}</td>
                                                    <td>
                                                        {g.date_resolved.as_deref().map(short_date).unwrap_or("-").to_owned()}
                                                    </td>
                                                    <td><span class=badge_class(label)>{label}</span></td>
                                                    <td class="table__actions">
                                                        <button
                                                            class="link"
                                                            type="button"
                                                            on:click=move |_| {
                                                                status.set(current.to_owned());
                                                                resolution.set(String::new());
                                                                editing.set(Some(id.clone()));
                                                            }
                                                        >
                                                            "Update"
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
                        <Alert kind=AlertKind::Error message=e.user_message("Failed to load grievances") />
                    }
                    .into_any(),
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </DashboardLayout>
    }
}
