mod commands;
mod core;
mod models;

use crate::core::{app_log, main_window, persistence::StateStore, ShellState};
use crate::models::ShellConfig;
use serde_json::json;
use tauri::{Manager, RunEvent};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .on_menu_event(|app, event| {
            crate::core::context_menu::handle_menu_event(app, event);
        })
        .setup(|app| {
            let app_handle = app.handle().clone();

            let log_dir = app_handle.path().app_log_dir()?;
            if let Err(e) = app_log::init(log_dir) {
                eprintln!("{}", e);
            }
            app_log::install_panic_hook();

            let config = ShellConfig::new();
            let state_path = app_handle
                .path()
                .app_data_dir()?
                .join(&config.state_file_name);
            app_log::info_with(
                "app",
                "startup",
                json!({
                    "version": app_handle.package_info().version.to_string(),
                    "state_path": state_path.display().to_string(),
                }),
            );

            app.manage(ShellState::new(config, StateStore::new(state_path))?);
            if let Err(e) = main_window::create(&app_handle) {
                app_log::error("window", "create_failed", json!({ "error": format!("{:#}", e) }));
                return Err(e.into());
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::zoom::zoom_changed,
            commands::context_menu::show_context_menu,
        ])
        .on_window_event(|window, event| {
            main_window::handle_window_event(window, event);
        })
        .build(tauri::generate_context!())
        .expect("error while running tauri application");

    app.run(|_app_handle, event| match event {
        // macOS apps stay alive without windows; the dock icon brings the window back.
        #[cfg(target_os = "macos")]
        RunEvent::ExitRequested { api, code: None, .. } => {
            api.prevent_exit();
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            if let Err(e) = main_window::ensure(_app_handle) {
                app_log::error("window", "reopen_failed", json!({ "error": e.to_string() }));
            }
        }
        RunEvent::Exit => app_log::info("app", "exit"),
        _ => {}
    });
}
