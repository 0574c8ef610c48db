#![allow(warnings)]
//! Scrum Board Frontend Entry Point

mod api;
mod app;
mod board;
mod collection;
mod commands;
mod components;
mod config;
mod context;
mod forms;
mod logging;
mod markdown;
mod models;
mod router;
mod session;

use app::App;
use config::Config;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = Config::from_window();
    logging::init(config.log_level());
    log::info!("[APP] Starting, API root {}", config.api_root);
    mount_to_body(move || view! { <App config=config /> });
}
