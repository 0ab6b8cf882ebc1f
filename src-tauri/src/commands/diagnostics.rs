use tauri::{AppHandle, Manager};

use super::CommandResult;
use crate::state::AppState;

/// Called once the page has loaded; returns the idle button label so the
/// page renders the same text the trigger restores after each attempt.
#[tauri::command]
pub fn frontend_ready(app: AppHandle) -> CommandResult<String> {
    tracing::info!("Frontend ready");
    let label = app.state::<AppState>().trigger().labels().idle.clone();
    CommandResult::ok(label)
}
