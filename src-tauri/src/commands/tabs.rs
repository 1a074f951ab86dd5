//! Tab management commands
use serde::Serialize;
use tauri::{AppHandle, Manager};
use wisp_core::{Tab, TabSummary};

use crate::host::dispatch;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T> From<wisp_core::Result<T>> for CommandResult<T> {
    fn from(result: wisp_core::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn summary(result: wisp_core::Result<Tab>) -> CommandResult<TabSummary> {
    result.map(|tab| TabSummary::from_tab(&tab, true)).into()
}

#[tauri::command]
pub async fn create_tab(app: AppHandle, url: String) -> CommandResult<TabSummary> {
    summary(dispatch(&app, |browser| browser.create_tab(&url)))
}

#[tauri::command]
pub async fn open_new_tab(app: AppHandle) -> CommandResult<TabSummary> {
    summary(dispatch(&app, |browser| browser.open_new_tab()))
}

#[tauri::command]
pub async fn activate_tab(app: AppHandle, tab_id: String) -> CommandResult<TabSummary> {
    summary(dispatch(&app, |browser| browser.activate_tab(&tab_id)))
}

#[tauri::command]
pub async fn close_tab(app: AppHandle, tab_id: String) -> CommandResult<()> {
    dispatch(&app, |browser| browser.close_tab(&tab_id)).into()
}

#[tauri::command]
pub async fn close_active_tab(app: AppHandle) -> CommandResult<()> {
    dispatch(&app, |browser| browser.close_active_tab()).into()
}

#[tauri::command]
pub async fn navigate_tab(app: AppHandle, tab_id: String, url: String) -> CommandResult<TabSummary> {
    dispatch(&app, |browser| {
        let tab = browser.navigate_tab(&tab_id, &url)?;
        let is_active = browser.active_tab_id() == Some(tab.id.as_str());
        Ok(TabSummary::from_tab(&tab, is_active))
    })
    .into()
}

/// Enter pressed in the URL bar
#[tauri::command]
pub async fn submit_address(app: AppHandle, input: String) -> CommandResult<TabSummary> {
    summary(dispatch(&app, |browser| browser.submit_address(&input)))
}

#[tauri::command]
pub async fn refresh_active_tab(app: AppHandle) -> CommandResult<()> {
    dispatch(&app, |browser| browser.refresh_active_tab()).into()
}

#[tauri::command]
pub fn get_tabs(app: AppHandle) -> CommandResult<Vec<TabSummary>> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(state.read_browser(|browser| browser.snapshot().tabs)),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}

#[tauri::command]
pub fn get_active_tab(app: AppHandle) -> CommandResult<Option<TabSummary>> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(state.read_browser(|browser| {
            browser
                .active_tab()
                .map(|tab| TabSummary::from_tab(&tab, true))
        })),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}
