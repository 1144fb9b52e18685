#![allow(warnings)]
//! Waste Admin Frontend Entry Point

mod models;
mod error;
mod config;
mod session;
mod api;
mod geo;
mod maps;
mod format;
mod reconcile;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;
use rolling_logger::{init_logger, LevelFilter, DEFAULT_CAPACITY};

fn main() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { LevelFilter::DEBUG } else { LevelFilter::INFO };
    if let Err(err) = init_logger(level, DEFAULT_CAPACITY) {
        web_sys::console::error_1(&format!("logger init failed: {}", err).into());
    }

    mount_to_body(App);
}
