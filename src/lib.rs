use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod actions;
mod browser;
mod components;
mod config;
mod drag;
mod state;

use components::app::App;
use config::AppConfig;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::load();
    let _ = console_log::init_with_level(config.log_level.to_level());
    log::info!("sigscope starting, backend {}", config.api_base);
    mount_to_body(move || view! { <App config=config /> });
}
