//! Tauri IPC Commands
//!
//! These commands bridge the chrome UI to the Rust core. Every mutation goes
//! through [`crate::host::dispatch`] so queued view work runs and the UI gets
//! a fresh `chrome-updated` snapshot.

pub mod chrome;
pub mod diagnostics;
pub mod extensions;
pub mod tabs;

pub fn ui_webview_label(window_label: &str) -> String {
    format!("ui-{window_label}")
}
