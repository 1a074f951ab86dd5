//! Sidebar, URL bar, toast and clipboard commands
use chrono::Utc;
use tauri::{AppHandle, Manager};
use wisp_core::ChromeSnapshot;

use super::tabs::CommandResult;
use crate::host::{dispatch, ContentBounds, WebviewHost};
use crate::state::AppState;

#[tauri::command]
pub fn get_chrome_state(app: AppHandle) -> CommandResult<ChromeSnapshot> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(state.read_browser(|browser| browser.snapshot())),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}

#[tauri::command]
pub async fn toggle_sidebar(app: AppHandle) -> CommandResult<bool> {
    dispatch(&app, |browser| browser.toggle_sidebar()).into()
}

/// Returns the URL handed to the UI for writing to the clipboard
#[tauri::command]
pub async fn copy_active_url(app: AppHandle) -> CommandResult<Option<String>> {
    dispatch(&app, |browser| Ok(browser.copy_active_url())).into()
}

/// The UI's answer to a `write-clipboard` request
#[tauri::command]
pub async fn clipboard_result(app: AppHandle, ok: bool) -> CommandResult<()> {
    let now = Utc::now();
    dispatch(&app, |browser| {
        browser.clipboard_result(ok, now);
        Ok(())
    })
    .into()
}

#[tauri::command]
pub async fn show_toast(app: AppHandle, message: String) -> CommandResult<()> {
    let now = Utc::now();
    dispatch(&app, |browser| {
        browser.show_toast(&message, now);
        Ok(())
    })
    .into()
}

/// Update all webview positions when the window or sidebar changes
#[tauri::command]
pub async fn update_content_bounds(
    app: AppHandle,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> CommandResult<()> {
    let Some(host) = app.try_state::<WebviewHost>() else {
        return CommandResult::err("WebviewHost not found".to_string());
    };

    host.set_bounds(
        &app,
        ContentBounds {
            x,
            y,
            width,
            height,
        },
    );
    CommandResult::ok(())
}
