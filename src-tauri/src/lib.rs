//! ReelGrab - Tauri Application
//!
//! The webview only renders the field, button and status line; the download
//! sequence itself runs in Rust behind the `download_video` command.

mod commands;
mod state;

use state::AppState;
use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    reelgrab_core::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let state = AppState::new()?;
            app.manage(state);

            WebviewWindowBuilder::new(app, "main", WebviewUrl::App("index.html".into()))
                .title("ReelGrab")
                .inner_size(520.0, 320.0)
                .min_inner_size(400.0, 260.0)
                .center()
                .build()?;

            tracing::info!("ReelGrab started");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Download commands
            commands::download::download_video,
            commands::download::reveal_saved_file,
        ])
        .run(tauri::generate_context!())
        .expect("error while running ReelGrab");
}
