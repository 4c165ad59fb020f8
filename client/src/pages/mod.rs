//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (form state, API calls through
//! the auth context, navigation) and delegates rendering details to
//! `components`.

pub mod audit;
pub mod auth_callback;
pub mod consent_forms;
pub mod dashboard;
pub mod dsr;
pub mod forgot_password;
pub mod grievances;
pub mod home;
pub mod login;
pub mod not_found;
pub mod onboarding;
pub mod profile;
pub mod purposes;
pub mod reset_password;
pub mod signup;
