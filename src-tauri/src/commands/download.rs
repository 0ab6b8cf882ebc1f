//! Download commands and the webview-backed UI adapters
use serde::Serialize;
use std::path::Path;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_opener::OpenerExt;

use reelgrab_core::{StatusArea, TriggerControl, TriggerOutcome};

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SavedInfo {
    pub path: String,
    pub file_name: String,
    pub size: u64,
    pub sha256: String,
    pub saved_at: String,
}

impl From<reelgrab_core::SavedFile> for SavedInfo {
    fn from(saved: reelgrab_core::SavedFile) -> Self {
        Self {
            path: saved.path.to_string_lossy().to_string(),
            file_name: saved.file_name,
            size: saved.size,
            sha256: saved.sha256,
            saved_at: saved.saved_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ControlUpdate<'a> {
    enabled: Option<bool>,
    label: Option<&'a str>,
}

/// Button in the webview, driven through `trigger-updated` events
struct WebviewControl {
    app: AppHandle,
}

impl TriggerControl for WebviewControl {
    fn set_enabled(&self, enabled: bool) {
        let _ = self.app.emit(
            "trigger-updated",
            ControlUpdate {
                enabled: Some(enabled),
                label: None,
            },
        );
    }

    fn set_label(&self, label: &str) {
        let _ = self.app.emit(
            "trigger-updated",
            ControlUpdate {
                enabled: None,
                label: Some(label),
            },
        );
    }
}

/// Status line in the webview, driven through `status-updated` events
struct WebviewStatus {
    app: AppHandle,
}

impl StatusArea for WebviewStatus {
    fn set_text(&self, text: &str) {
        let _ = self.app.emit("status-updated", text);
    }
}

#[tauri::command]
pub async fn download_video(app: AppHandle, url: String) -> CommandResult<SavedInfo> {
    let trigger = app.state::<AppState>().trigger();
    let control = WebviewControl { app: app.clone() };
    let status = WebviewStatus { app: app.clone() };

    match trigger.trigger(&url, &control, &status).await {
        TriggerOutcome::Saved(saved) => CommandResult::ok(saved.into()),
        TriggerOutcome::EmptyInput => CommandResult::err("empty input".to_string()),
        TriggerOutcome::AlreadyRunning => {
            CommandResult::err("download already in progress".to_string())
        }
        TriggerOutcome::Rejected { status } => {
            CommandResult::err(format!("endpoint returned HTTP {}", status))
        }
        TriggerOutcome::TransportFailed { message } | TriggerOutcome::SaveFailed { message } => {
            CommandResult::err(message)
        }
    }
}

#[tauri::command]
pub fn reveal_saved_file(app: AppHandle, path: String) -> CommandResult<()> {
    match app.opener().reveal_item_in_dir(Path::new(&path)) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
