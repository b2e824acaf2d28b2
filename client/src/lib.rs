//! # client
//!
//! Leptos + WASM browser UI for the user-authentication dashboard.
//!
//! Pages and components render from the `session` crate's state: the
//! [`AuthSession`](session::AuthSession) owns the token and current user, and
//! this crate mirrors its snapshots into a Leptos signal so routes, the navbar
//! and the admin panel react to sign-in, sign-out and forced logouts alike.

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
