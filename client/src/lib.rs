//! Browser front-end for the consent portal.
//!
//! SYSTEM CONTEXT
//! ==============
//! Client-side rendered Leptos app. Session logic lives in the `portal`
//! crate; this crate binds it to `localStorage` and `fetch`, and renders the
//! auth, onboarding and dashboard pages.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
