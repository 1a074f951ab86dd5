//! Wisp Browser - Tauri Application
//!
//! - The chrome UI is one webview, each tab another
//! - Rust owns all state; webviews render and report events

mod commands;
mod host;
mod menu;
mod state;

use host::WebviewHost;
use state::AppState;
use std::time::Duration;
use tauri::webview::WebviewBuilder;
use tauri::window::WindowBuilder;
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, WebviewUrl};
use wisp_core::Shortcut;

pub(crate) const MAIN_WINDOW: &str = "main";

/// Drives toast expiry, the loading bar and scheduled reloads
const TICK_INTERVAL: Duration = Duration::from_millis(50);

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    wisp_core::init_logging();

    tauri::Builder::default()
        .setup(|app| {
            let state = AppState::new()?;
            let window_config = state.window_config();

            app.manage(state);
            app.manage(WebviewHost::new());

            app.handle().set_menu(menu::build(app.handle())?)?;
            app.on_menu_event(|app, event| {
                let Some(shortcut) = Shortcut::from_id(event.id().as_ref()) else {
                    return;
                };
                if let Err(e) = host::dispatch(app, |browser| browser.handle_shortcut(shortcut)) {
                    tracing::warn!(shortcut = shortcut.id(), error = %e, "Shortcut failed");
                }
            });

            let window = WindowBuilder::new(app, MAIN_WINDOW)
                .title("Wisp")
                .inner_size(window_config.width, window_config.height)
                .min_inner_size(window_config.min_width, window_config.min_height)
                .center()
                .build()?;

            let ui_webview = WebviewBuilder::new(
                commands::ui_webview_label(MAIN_WINDOW),
                WebviewUrl::App("index.html".into()),
            )
            .auto_resize()
            .enable_clipboard_access();

            let ui_webview = window.add_child(
                ui_webview,
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(window_config.width, window_config.height),
            )?;
            let _ = ui_webview.show();

            // Views can only be created once the window exists
            host::dispatch(app.handle(), |browser| browser.initialize())?;

            tauri::async_runtime::spawn(run_ticker(app.handle().clone()));

            tracing::info!("Wisp Browser started");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Tab commands
            commands::tabs::create_tab,
            commands::tabs::open_new_tab,
            commands::tabs::activate_tab,
            commands::tabs::close_tab,
            commands::tabs::close_active_tab,
            commands::tabs::navigate_tab,
            commands::tabs::submit_address,
            commands::tabs::refresh_active_tab,
            commands::tabs::get_tabs,
            commands::tabs::get_active_tab,
            // Chrome commands
            commands::chrome::get_chrome_state,
            commands::chrome::toggle_sidebar,
            commands::chrome::copy_active_url,
            commands::chrome::clipboard_result,
            commands::chrome::show_toast,
            commands::chrome::update_content_bounds,
            // Extension commands
            commands::extensions::load_extension,
            commands::extensions::unload_extension,
            commands::extensions::get_extensions,
            commands::extensions::get_extensions_path,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Wisp browser");
}

async fn run_ticker(app: AppHandle) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if let Err(e) = host::tick(&app) {
            tracing::error!(error = %e, "Tick failed");
        }
    }
}
