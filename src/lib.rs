mod api;
mod app;
mod components;
mod lookup;
mod models;
mod pages;
mod state;

pub use app::App;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = api::EnvConfig::new();
    wasm_logger::init(wasm_logger::Config::new(config.log_level()));
    log::info!("api url: {}", config.api_url);

    mount_to_body(App);
}
