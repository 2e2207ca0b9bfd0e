mod api;
mod config;
mod constants;
mod naming;
mod note;
mod save;
mod state;
mod storage;
mod ui;

use adw::prelude::*;
use adw::Application;
use gtk4::glib;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::constants::APP_ID;
use crate::state::AppState;

#[tokio::main]
async fn main() -> glib::ExitCode {
    tracing_subscriber::fmt::init();

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(build_ui);

    app.run()
}

fn build_ui(app: &Application) {
    let config = AppConfig::load();
    tracing::info!(
        "Starting with save mode {:?}, notes in {:?}",
        config.save_mode,
        config.notes_dir
    );

    let state = Rc::new(RefCell::new(AppState::new(config)));
    let window = ui::main_window::build_main_window(app, state);
    window.present();
}
