//! vetdesk web front end.
//!
//! Leptos views for the clinic manager, composed around the session store
//! and access checks from `vetdesk-access`.

#![allow(non_snake_case)]

pub mod app;
pub mod auth;
pub mod components;
#[cfg(feature = "ssr")]
pub mod config;
pub mod pages;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    use leptos::prelude::*;

    console_error_panic_hook::set_once();
    let config = auth::embedded_config().unwrap_or_default();
    leptos::mount::hydrate_body(move || {
        provide_context(config);
        view! { <App/> }
    });
}
