//! Extension commands
use serde::Serialize;
use std::path::PathBuf;
use tauri::{AppHandle, Manager};
use wisp_core::Extension;

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtensionInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub path: String,
    pub content_scripts: usize,
}

impl From<Extension> for ExtensionInfo {
    fn from(extension: Extension) -> Self {
        Self {
            name: extension.name().to_string(),
            version: extension.version().to_string(),
            description: extension.manifest.description.clone(),
            path: extension.path.display().to_string(),
            content_scripts: extension.content_scripts.len(),
            id: extension.id,
        }
    }
}

#[tauri::command]
pub fn load_extension(app: AppHandle, path: String) -> CommandResult<ExtensionInfo> {
    let Some(state) = app.try_state::<AppState>() else {
        return CommandResult::err("Browser not initialized".to_string());
    };

    let path = PathBuf::from(path);
    state
        .read_browser(|browser| browser.load_extension(&path))
        .map(ExtensionInfo::from)
        .into()
}

#[tauri::command]
pub fn unload_extension(app: AppHandle, extension_id: String) -> CommandResult<bool> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(
            state
                .read_browser(|browser| browser.unload_extension(&extension_id))
                .is_some(),
        ),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}

#[tauri::command]
pub fn get_extensions(app: AppHandle) -> CommandResult<Vec<ExtensionInfo>> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(state.read_browser(|browser| {
            browser
                .extensions()
                .into_iter()
                .map(ExtensionInfo::from)
                .collect()
        })),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}

#[tauri::command]
pub fn get_extensions_path(app: AppHandle) -> CommandResult<String> {
    match app.try_state::<AppState>() {
        Some(state) => CommandResult::ok(
            state.read_browser(|browser| browser.extensions_path().display().to_string()),
        ),
        None => CommandResult::err("Browser not initialized".to_string()),
    }
}
