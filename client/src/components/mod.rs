//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared page chrome and route gating while reading the
//! auth context provided by `state::auth`.

pub mod layout;
pub mod protected_route;
pub mod ui;
