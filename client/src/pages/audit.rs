//! Audit log viewer with free-text search and an action filter.

#[cfg(test)]
#[path = "audit_test.rs"]
mod audit_test;

use leptos::prelude::*;
use portal::types::AuditLog;

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Spinner};
use crate::state::auth::use_auth;

/// Distinct actions in first-seen order, for the filter dropdown.
pub fn actions(logs: &[AuditLog]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for log in logs {
        if !seen.contains(&log.action) {
            seen.push(log.action.clone());
        }
    }
    seen
}

/// Case-insensitive match of `query` against action, user, resource and
/// details; an empty `action` matches any action.
pub fn filter_logs(logs: &[AuditLog], query: &str, action: &str) -> Vec<AuditLog> {
    let query = query.trim().to_lowercase();
    logs.iter()
        .filter(|log| action.is_empty() || log.action == action)
        .filter(|log| {
            query.is_empty()
                || [&log.action, &log.user_id, &log.resource_id, &log.details]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

#[component]
pub fn AuditLogsPage() -> impl IntoView {
    let auth = use_auth();
    let logs = LocalResource::new(move || async move {
        auth.call(|s, token| async move { s.api().list_audit_logs(&token).await }).await
    });
    let query = RwSignal::new(String::new());
    let action = RwSignal::new(String::new());

    view! {
        <DashboardLayout title="Audit logs">
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match logs.get() {
                    Some(Ok(all)) => {
                        let options = actions(&all);
                        let visible = move || filter_logs(&all, &query.get(), &action.get());
                        view! {
                            <div class="toolbar">
                                <input
                                    class="form-field__input"
                                    type="search"
                                    placeholder="Search logs"
                                    prop:value=move || query.get()
                                    on:input=move |ev| query.set(event_target_value(&ev))
                                />
                                <select
                                    class="form-field__input"
                                    prop:value=move || action.get()
                                    on:change=move |ev| action.set(event_target_value(&ev))
                                >
                                    <option value="">"All actions"</option>
                                    {options
                                        .into_iter()
                                        .map(|a| { let value = a.clone(); view! { <option value=value>{a}</option> } })
                                        .collect_view()}
                                </select>
                            </div>
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Time"</th>
                                        <th>"Action"</th>
                                        <th>"User"</th>
                                        <th>"Resource"</th>
                                        <th>"Details"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {move || {
                                        visible()
                                            .into_iter()
                                            .map(|log| {
                                                view! {
                                                    <tr>
                                                        <td>{log.timestamp}</td>
                                                        <td>{log.action}</td>
                                                        <td>{log.user_id}</td>
                                                        <td>{log.resource_id}</td>
                                                        <td>{log.details}</td>
                                                    </tr>
                                                }
                                            })
                                            .collect_view()
                                    }}
                                </tbody>
                            </table>
                        }
                        .into_any()
                    }
                    Some(Err(e)) => view! {
                        <Alert kind=AlertKind::Error message=e.user_message("Failed to load audit logs") />
                    }
                    .into_any(),
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </DashboardLayout>
    }
}
