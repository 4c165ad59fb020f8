//! Dashboard overview.
//!
//! Fiduciaries get headline counts across purposes, consent forms, data
//! requests and grievances; individuals get their account summary.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::components::A;
use portal::types::{ConsentForm, ConsentFormStatus, DsrRequest, DsrStatus, Grievance, GrievanceStatus, Purpose, PurposeStatus};
use portal::{ApiError, UserKind};

use crate::components::layout::DashboardLayout;
use crate::components::ui::{Alert, AlertKind, Spinner};
use crate::state::auth::use_auth;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overview {
    pub active_purposes: usize,
    pub published_forms: usize,
    pub open_requests: usize,
    pub open_grievances: usize,
}

impl Overview {
    pub fn from_records(purposes: &[Purpose], forms: &[ConsentForm], requests: &[DsrRequest], grievances: &[Grievance]) -> Self {
        Self {
            active_purposes: purposes.iter().filter(|p| p.status == PurposeStatus::Active).count(),
            published_forms: forms.iter().filter(|f| f.status == ConsentFormStatus::Published).count(),
            open_requests: requests
                .iter()
                .filter(|r| matches!(r.status, DsrStatus::Pending | DsrStatus::Processing))
                .count(),
            open_grievances: grievances
                .iter()
                .filter(|g| matches!(g.status, GrievanceStatus::Pending | GrievanceStatus::Investigating))
                .count(),
        }
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let is_fiduciary = move || auth.state.with(|s| s.kind() == Some(UserKind::Fiduciary));

    view! {
        <DashboardLayout title="Overview">
            <Show when=is_fiduciary fallback=|| view! { <AccountSummary /> }>
                <FiduciaryOverview />
            </Show>
        </DashboardLayout>
    }
}

#[component]
fn FiduciaryOverview() -> impl IntoView {
    let auth = use_auth();
    let overview = LocalResource::new(move || async move {
        auth.call(|s, token| async move {
            let api = s.api();
            let purposes = api.list_purposes(&token).await?;
            let forms = api.list_consent_forms(&token).await?;
            let requests = api.list_dsr_requests(&token).await?;
            let grievances = api.list_grievances(&token).await?;
            Ok::<_, ApiError>(Overview::from_records(&purposes, &forms, &requests, &grievances))
        })
        .await
    });

    let stat = |href: &'static str, label: &'static str, value: usize| {
        view! {
            <A href={href} {..} class="stat-card">
                <span class="stat-card__value">{value}</span>
                <span class="stat-card__label">{label}</span>
            </A>
        }
    };

    view! {
        <Suspense fallback=move || view! { <Spinner /> }>
            {move || match overview.get() {
                Some(Ok(o)) => view! {
                    <div class="stat-grid">
                        {stat("/dashboard/purposes", "Active purposes", o.active_purposes)}
                        {stat("/dashboard/consent-forms", "Published consent forms", o.published_forms)}
                        {stat("/dashboard/dsr", "Open data requests", o.open_requests)}
                        {stat("/dashboard/grievances", "Open grievances", o.open_grievances)}
                    </div>
                }
                .into_any(),
                Some(Err(e)) => view! {
                    <Alert kind=AlertKind::Error message=e.user_message("Failed to load dashboard") />
                }
                .into_any(),
                None => view! { <Spinner /> }.into_any(),
            }}
        </Suspense>
    }
}

#[component]
fn AccountSummary() -> impl IntoView {
    let auth = use_auth();
    let identity = move || auth.state.with(|s| s.identity().cloned());

    move || {
        identity().map(|i| {
            view! {
                <div class="card">
                    <h2>{format!("Welcome, {}", i.name)}</h2>
                    <dl class="details">
                        <dt>"Email"</dt>
                        <dd>{i.email}</dd>
                        <dt>"Age"</dt>
                        <dd>{i.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_owned())}</dd>
                        <dt>"Guardian"</dt>
                        <dd>{i.guardian_email.unwrap_or_else(|| "-".to_owned())}</dd>
                    </dl>
                    <A href="/dashboard/profile">"Edit profile"</A>
                </div>
            }
        })
    }
}
