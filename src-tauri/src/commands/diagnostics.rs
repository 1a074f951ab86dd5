use tauri::AppHandle;
use wisp_core::ChromeSnapshot;

use super::tabs::CommandResult;
use crate::host::dispatch;

/// The UI finished booting; hand it the current state
#[tauri::command]
pub async fn frontend_ready(app: AppHandle) -> CommandResult<ChromeSnapshot> {
    tracing::info!("Frontend ready");
    dispatch(&app, |browser| Ok(browser.snapshot())).into()
}
