//! Webview host
//!
//! Executes the browser's queued [`HostCommand`]s against real child
//! webviews and feeds page events back into the browser. Each tab gets its
//! own child webview inside the main window; only the active one is shown.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tauri::webview::{NewWindowResponse, PageLoadEvent, Webview, WebviewBuilder};
use tauri::{AppHandle, Emitter, LogicalPosition, LogicalSize, Manager, WebviewUrl};
use wisp_core::{Browser, ChromeSnapshot, ContentEvent, CoreError, HostCommand};

use crate::commands::ui_webview_label;
use crate::state::AppState;
use crate::MAIN_WINDOW;

/// Event carrying a [`ChromeSnapshot`] to the UI webview
pub const CHROME_UPDATED_EVENT: &str = "chrome-updated";

/// Tracks one child webview per tab
pub struct WebviewHost {
    /// tab_id -> webview label
    webviews: Arc<RwLock<HashMap<String, String>>>,
    bounds: Arc<RwLock<ContentBounds>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ContentBounds {
    fn default() -> Self {
        Self {
            x: 260.0, // sidebar width
            y: 48.0,  // toolbar height
            width: 1340.0,
            height: 952.0,
        }
    }
}

impl WebviewHost {
    pub fn new() -> Self {
        Self {
            webviews: Arc::new(RwLock::new(HashMap::new())),
            bounds: Arc::new(RwLock::new(ContentBounds::default())),
        }
    }

    fn label_for(&self, tab_id: &str) -> Option<String> {
        self.webviews.read().get(tab_id).cloned()
    }

    fn register(&self, tab_id: &str, label: String) {
        self.webviews.write().insert(tab_id.to_string(), label);
    }

    fn unregister(&self, tab_id: &str) -> Option<String> {
        self.webviews.write().remove(tab_id)
    }

    fn all_labels(&self) -> Vec<String> {
        self.webviews.read().values().cloned().collect()
    }

    pub fn bounds(&self) -> ContentBounds {
        *self.bounds.read()
    }

    /// Move and resize every tab webview to the content area
    pub fn set_bounds(&self, app: &AppHandle, bounds: ContentBounds) {
        *self.bounds.write() = bounds;

        let position = LogicalPosition::new(bounds.x, bounds.y);
        let size = LogicalSize::new(bounds.width, bounds.height);
        for label in self.all_labels() {
            if let Some(webview) = app.get_webview(&label) {
                let _ = webview.set_position(position);
                let _ = webview.set_size(size);
            }
        }
    }

    fn webview(&self, app: &AppHandle, tab_id: &str) -> Result<Webview, String> {
        let label = self
            .label_for(tab_id)
            .ok_or_else(|| format!("No webview for tab: {}", tab_id))?;
        app.get_webview(&label)
            .ok_or_else(|| format!("Webview not found: {}", label))
    }

    fn apply(&self, app: &AppHandle, command: &HostCommand) -> Result<(), String> {
        match command {
            HostCommand::CreateView { tab_id, url } => self.create_view(app, tab_id, url),
            HostCommand::ShowView { tab_id } => self
                .webview(app, tab_id)?
                .show()
                .map_err(|e| format!("Failed to show webview: {}", e)),
            HostCommand::HideView { tab_id } => self
                .webview(app, tab_id)?
                .hide()
                .map_err(|e| format!("Failed to hide webview: {}", e)),
            HostCommand::LoadUrl { tab_id, url } => {
                let parsed = parse_url(url)?;
                self.webview(app, tab_id)?
                    .navigate(parsed)
                    .map_err(|e| format!("Navigation failed: {}", e))
            }
            HostCommand::Reload { tab_id } => self
                .webview(app, tab_id)?
                .reload()
                .map_err(|e| format!("Reload failed: {}", e)),
            HostCommand::DestroyView { tab_id } => {
                // Already gone is fine
                let Some(label) = self.unregister(tab_id) else {
                    return Ok(());
                };
                if let Some(webview) = app.get_webview(&label) {
                    webview
                        .close()
                        .map_err(|e| format!("Failed to close webview: {}", e))?;
                }
                tracing::info!(label = %label, "Closed webview");
                Ok(())
            }
            HostCommand::WriteClipboard { text } => app
                .emit_to(ui_webview_label(MAIN_WINDOW), "write-clipboard", text)
                .map_err(|e| format!("Failed to request clipboard write: {}", e)),
            HostCommand::SetTrafficLightsVisible { visible } => {
                tracing::debug!(visible, "Traffic lights visibility");
                app.emit_to(
                    ui_webview_label(MAIN_WINDOW),
                    "traffic-lights-visible",
                    visible,
                )
                .map_err(|e| format!("Failed to update traffic lights: {}", e))
            }
        }
    }

    fn create_view(&self, app: &AppHandle, tab_id: &str, url: &str) -> Result<(), String> {
        if let Some(existing) = self.label_for(tab_id) {
            if app.get_webview(&existing).is_some() {
                return Ok(());
            }
            self.unregister(tab_id);
        }

        let window = app
            .get_window(MAIN_WINDOW)
            .ok_or_else(|| "Main window not found".to_string())?;
        let webview_url = WebviewUrl::External(parse_url(url)?);
        let label = format!("content-{}", tab_id);
        let bounds = self.bounds();

        let app_for_load = app.clone();
        let tab_for_load = tab_id.to_string();
        let app_for_title = app.clone();
        let tab_for_title = tab_id.to_string();
        let app_for_new_window = app.clone();
        let tab_for_new_window = tab_id.to_string();

        let builder = WebviewBuilder::new(&label, webview_url)
            .auto_resize()
            .on_page_load(move |webview, payload| {
                let url = payload.url().to_string();
                match payload.event() {
                    PageLoadEvent::Started => {
                        report(&app_for_load, &tab_for_load, ContentEvent::DidNavigate { url });
                        report(&app_for_load, &tab_for_load, ContentEvent::DidStartLoading);
                    }
                    PageLoadEvent::Finished => {
                        report(&app_for_load, &tab_for_load, ContentEvent::DomReady);
                        report(&app_for_load, &tab_for_load, ContentEvent::DidFinishLoad);
                        if let Some(favicon) = favicon_for(payload.url()) {
                            report(
                                &app_for_load,
                                &tab_for_load,
                                ContentEvent::FaviconUpdated {
                                    favicons: vec![favicon],
                                },
                            );
                        }
                        inject_content_scripts(&app_for_load, &webview, &url);
                    }
                }
            })
            .on_document_title_changed(move |_webview, title| {
                report(
                    &app_for_title,
                    &tab_for_title,
                    ContentEvent::PageTitleUpdated { title },
                );
            })
            .on_new_window(move |url, _features| {
                report(
                    &app_for_new_window,
                    &tab_for_new_window,
                    ContentEvent::NewWindowRequested {
                        url: url.to_string(),
                    },
                );
                NewWindowResponse::Deny
            });

        let webview = window
            .add_child(
                builder,
                LogicalPosition::new(bounds.x, bounds.y),
                LogicalSize::new(bounds.width, bounds.height),
            )
            .map_err(|e| {
                tracing::error!(label = %label, tab_id = %tab_id, error = %e, "Failed to create child webview");
                format!("Failed to create webview: {}", e)
            })?;

        // Start hidden; the browser shows the active one
        let _ = webview.hide();
        self.register(tab_id, label.clone());

        tracing::info!(label = %label, tab_id = %tab_id, "Created child webview");
        Ok(())
    }
}

impl Default for WebviewHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `f` against the browser, then carry out whatever it queued and push
/// the new chrome state to the UI.
pub fn dispatch<T>(
    app: &AppHandle,
    f: impl FnOnce(&mut Browser) -> wisp_core::Result<T>,
) -> wisp_core::Result<T> {
    let state = app
        .try_state::<AppState>()
        .ok_or(CoreError::NotInitialized)?;

    let (result, snapshot) = state.with_browser(|browser| {
        let result = f(browser);
        Ok((result, browser.snapshot()))
    })?;

    schedule_commands(app);
    emit_snapshot(app, &snapshot);

    result
}

/// Advance the browser's timers; only emits when something changed
pub fn tick(app: &AppHandle) -> wisp_core::Result<()> {
    let Some(state) = app.try_state::<AppState>() else {
        return Ok(());
    };

    let snapshot = state.with_browser(|browser| {
        let changed = browser.tick(Utc::now())?;
        Ok(changed.then(|| browser.snapshot()))
    })?;

    schedule_commands(app);
    if let Some(snapshot) = snapshot {
        emit_snapshot(app, &snapshot);
    }

    Ok(())
}

/// Webviews are only touched from the main thread, so queued commands run
/// there one at a time.
fn schedule_commands(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };
    if state.commands().is_empty() {
        return;
    }

    let handle = app.clone();
    if let Err(e) = app.run_on_main_thread(move || execute(&handle)) {
        tracing::error!(error = %e, "Failed to schedule host commands");
    }
}

fn execute(app: &AppHandle) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };
    let Some(host) = app.try_state::<WebviewHost>() else {
        tracing::warn!(
            count = state.commands().len(),
            "Webview host not ready, commands stay queued"
        );
        return;
    };
    // A drain already running picks up anything queued since
    let Some(drain) = state.commands().drain() else {
        return;
    };

    for command in drain {
        let Err(reason) = host.apply(app, &command) else {
            continue;
        };
        tracing::warn!(
            tab_id = command.tab_id().unwrap_or("-"),
            ?command,
            error = %reason,
            "Host command failed"
        );
        if let HostCommand::CreateView { tab_id, .. } | HostCommand::LoadUrl { tab_id, .. } =
            &command
        {
            let now = Utc::now();
            if let Err(e) = dispatch(app, |browser| browser.load_rejected(tab_id, &reason, now)) {
                tracing::error!(tab_id = %tab_id, error = %e, "Failed to record rejected load");
            }
        }
    }
}

fn emit_snapshot(app: &AppHandle, snapshot: &ChromeSnapshot) {
    if let Err(e) = app.emit_to(ui_webview_label(MAIN_WINDOW), CHROME_UPDATED_EVENT, snapshot) {
        tracing::warn!(error = %e, "Failed to emit chrome state");
    }
}

fn report(app: &AppHandle, tab_id: &str, event: ContentEvent) {
    let now = Utc::now();
    if let Err(e) = dispatch(app, |browser| browser.handle_content_event(tab_id, event, now)) {
        tracing::warn!(tab_id = %tab_id, error = %e, "Failed to handle page event");
    }
}

fn inject_content_scripts(app: &AppHandle, webview: &Webview, url: &str) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };

    for script in state.read_browser(|browser| browser.content_scripts_for(url)) {
        if let Err(e) = webview.eval(script.as_str()) {
            tracing::warn!(url = %url, error = %e, "Failed to inject content script");
        }
    }
}

fn parse_url(url: &str) -> Result<url::Url, String> {
    url.parse::<url::Url>()
        .map_err(|_| format!("Invalid URL: {}", url))
}

/// Conventional favicon location for http(s) pages
fn favicon_for(url: &url::Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.join("/favicon.ico").ok().map(|icon| icon.to_string())
}
