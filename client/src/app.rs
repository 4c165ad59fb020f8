//! Root component and route table.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use portal::UserKind;

use crate::components::protected_route::ProtectedRoute;
use crate::pages::{
    audit::AuditLogsPage, auth_callback::AuthCallbackPage, consent_forms::ConsentFormsPage, dashboard::DashboardPage,
    dsr::DsrPage, forgot_password::ForgotPasswordPage, grievances::GrievancesPage, home::HomePage, login::LoginPage,
    not_found::NotFoundPage, onboarding::OrganizationOnboardingPage, onboarding::ProfileOnboardingPage,
    profile::ProfilePage, purposes::PurposesPage, reset_password::ResetPasswordPage, signup::SignupPage,
};
use crate::state::auth::AuthProvider;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Consent Portal" />
        <AuthProvider>
            <Router>
                <Routes fallback=|| view! { <NotFoundPage /> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/signup") view=SignupPage />
                    <Route path=path!("/forgot-password") view=ForgotPasswordPage />
                    <Route path=path!("/reset-password") view=ResetPasswordPage />
                    <Route path=path!("/auth/callback") view=AuthCallbackPage />
                    <Route
                        path=path!("/onboarding/organization")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary>
                                <OrganizationOnboardingPage />
                            </ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/onboarding/profile")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Individual>
                                <ProfileOnboardingPage />
                            </ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard")
                        view=|| view! { <ProtectedRoute><DashboardPage /></ProtectedRoute> }
                    />
                    <Route
                        path=path!("/dashboard/purposes")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary><PurposesPage /></ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard/consent-forms")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary><ConsentFormsPage /></ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard/dsr")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary><DsrPage /></ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard/grievances")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary><GrievancesPage /></ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard/audit")
                        view=|| view! {
                            <ProtectedRoute required_kind=UserKind::Fiduciary><AuditLogsPage /></ProtectedRoute>
                        }
                    />
                    <Route
                        path=path!("/dashboard/profile")
                        view=|| view! { <ProtectedRoute><ProfilePage /></ProtectedRoute> }
                    />
                </Routes>
            </Router>
        </AuthProvider>
    }
}
