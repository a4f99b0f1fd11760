#![recursion_limit = "256"]

#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod gemini;

pub mod grading;
pub mod missions;
pub mod model;
pub mod session;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(ui::App);
}
