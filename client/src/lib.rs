//! # client
//!
//! Leptos + WASM browser UI for eventboard.
//!
//! Every screen is its own HTML document. Each document loads the same WASM
//! bundle and calls [`mount_page`] with its page name; navigation between
//! screens is a full page load. Page state and backend access go through the
//! `eventboard` controllers, so this crate is only markup and browser glue.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: mount the page named by the hosting document.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn mount_page(name: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    app::mount(name);
}
