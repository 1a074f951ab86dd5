//! Main browser state container
//!
//! The browser owns every piece of shell state. Views are driven through
//! [`HostCommand`]s that the host drains after each call; the host reports
//! back with [`ContentEvent`]s. Nothing here touches a webview directly.

use chrono::{DateTime, Duration, Utc};
use std::path::Path;

use wisp_extensions::{Extension, ExtensionManager};
use wisp_navigation::{error_name, normalize_url, RecoveryPolicy, CRASH_MESSAGE};
use wisp_storage::Database;
use wisp_tabs::{Tab, TabError, TabManager, TabState};

use crate::chrome::Chrome;
use crate::config::Config;
use crate::error::CoreError;
use crate::event::ContentEvent;
use crate::host::HostCommand;
use crate::shortcut::Shortcut;
use crate::snapshot::{ChromeSnapshot, TabSummary};
use crate::Result;

pub const COPY_SUCCESS_MESSAGE: &str = "URL copied to clipboard";
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy URL";

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingReload {
    tab_id: String,
    due: DateTime<Utc>,
}

/// Main browser instance
pub struct Browser {
    config: Config,
    db: Database,
    tab_manager: TabManager,
    extension_manager: ExtensionManager,
    recovery: RecoveryPolicy,
    /// Single source of truth for which tab is shown
    active_tab_id: Option<String>,
    chrome: Chrome,
    pending_reloads: Vec<PendingReload>,
    outbox: Vec<HostCommand>,
    initialized: bool,
}

impl Browser {
    /// Open the configured database and build a browser on top of it
    pub fn new(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Self {
        let chrome = Chrome::new(
            millis(config.toast_duration_ms),
            millis(config.loading_settle_ms),
        );

        Self {
            tab_manager: TabManager::new(db.clone()),
            extension_manager: ExtensionManager::new(config.extensions_dir.clone()),
            recovery: config.recovery_policy(),
            active_tab_id: None,
            chrome,
            pending_reloads: Vec::new(),
            outbox: Vec::new(),
            initialized: false,
            config,
            db,
        }
    }

    /// Restore persisted state and make sure there is a tab to show
    pub fn initialize(&mut self) -> Result<()> {
        self.extension_manager.initialize()?;
        if self.config.autoload_extensions {
            let loaded = self.extension_manager.load_all();
            tracing::info!(count = loaded.len(), "Extensions loaded from disk");
        }

        if let Some(visible) = self.db.sidebar_visible()? {
            self.chrome.sidebar_visible = visible;
        }
        if !self.chrome.sidebar_visible {
            self.queue(HostCommand::SetTrafficLightsVisible { visible: false });
        }

        let restored = if self.config.restore_tabs {
            self.tab_manager.load_tabs()?
        } else {
            self.tab_manager.clear()?;
            Vec::new()
        };

        for tab in &restored {
            // A fresh view loads its URL from scratch
            self.apply_state(&tab.id, TabState::Loading)?;
            self.queue(HostCommand::CreateView {
                tab_id: tab.id.clone(),
                url: tab.url.clone(),
            });
        }

        let saved_active = self
            .db
            .active_tab_id()?
            .filter(|id| self.tab_manager.contains(id));

        match saved_active.or_else(|| self.tab_manager.last_tab_id()) {
            Some(tab_id) => {
                self.activate_tab(&tab_id)?;
            }
            None => {
                self.open_new_tab()?;
            }
        }

        self.initialized = true;
        tracing::info!(
            tabs = self.tab_manager.len(),
            restored = restored.len(),
            "Browser initialized"
        );

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // === Tab operations ===

    /// Register a tab at `url`, create its view and switch to it
    pub fn create_tab(&mut self, url: &str) -> Result<Tab> {
        let url = normalize_url(url)?;
        let tab = self.tab_manager.create_tab(url)?;

        self.queue(HostCommand::CreateView {
            tab_id: tab.id.clone(),
            url: tab.url.clone(),
        });
        tracing::info!(tab_id = %tab.id, url = %tab.url, "Tab created");

        self.activate_tab(&tab.id)
    }

    pub fn open_new_tab(&mut self) -> Result<Tab> {
        let homepage = self.config.homepage.clone();
        self.create_tab(&homepage)
    }

    pub fn activate_tab(&mut self, tab_id: &str) -> Result<Tab> {
        // Fails before anything changes when the id is unknown
        let tab = self.tab_manager.touch_tab(tab_id)?;

        if let Some(previous) = self.active_tab_id.take() {
            if previous != tab_id {
                self.queue(HostCommand::HideView { tab_id: previous });
            }
        }

        self.active_tab_id = Some(tab.id.clone());
        self.queue(HostCommand::ShowView {
            tab_id: tab.id.clone(),
        });

        self.chrome.address = tab.url.clone();
        if tab.is_loading() {
            self.chrome.loading.start();
        } else {
            self.chrome.loading.reset();
        }

        self.db.set_active_tab_id(&tab.id)?;
        tracing::debug!(tab_id = %tab.id, "Tab activated");

        Ok(tab)
    }

    pub fn navigate_tab(&mut self, tab_id: &str, url: &str) -> Result<Tab> {
        let url = normalize_url(url)?;
        let tab = self.tab_manager.navigate_tab(tab_id, url)?;

        // An explicit navigation supersedes any scheduled recovery
        self.pending_reloads.retain(|reload| reload.tab_id != tab_id);

        if self.is_active(tab_id) {
            self.chrome.loading.start();
            self.chrome.address = tab.url.clone();
        }

        self.queue(HostCommand::LoadUrl {
            tab_id: tab.id.clone(),
            url: tab.url.clone(),
        });
        tracing::info!(tab_id = %tab.id, url = %tab.url, "Navigating");

        Ok(tab)
    }

    /// Enter in the URL bar
    pub fn submit_address(&mut self, input: &str) -> Result<Tab> {
        let tab_id = self.active_tab_id.clone().ok_or(CoreError::NoActiveTab)?;
        self.navigate_tab(&tab_id, input)
    }

    /// The host could not start a load it was asked for
    pub fn load_rejected(&mut self, tab_id: &str, reason: &str, now: DateTime<Utc>) -> Result<()> {
        tracing::warn!(tab_id = %tab_id, reason = %reason, "Load rejected by host");

        if !self.tab_manager.contains(tab_id) {
            return Ok(());
        }

        self.apply_state(tab_id, TabState::Failed)?;
        if self.is_active(tab_id) {
            self.chrome.loading.finish(now);
        }

        Ok(())
    }

    pub fn close_tab(&mut self, tab_id: &str) -> Result<()> {
        let closed = self.tab_manager.close_tab(tab_id)?;

        self.pending_reloads.retain(|reload| reload.tab_id != tab_id);
        self.queue(HostCommand::DestroyView {
            tab_id: closed.id.clone(),
        });
        tracing::info!(tab_id = %closed.id, "Tab closed");

        if self.is_active(tab_id) {
            self.active_tab_id = None;
            self.chrome.address.clear();
            self.chrome.loading.reset();

            if let Some(last) = self.tab_manager.last_tab_id() {
                self.activate_tab(&last)?;
            }
        }

        if self.tab_manager.is_empty() {
            self.open_new_tab()?;
        }

        Ok(())
    }

    /// No-op without an active tab
    pub fn close_active_tab(&mut self) -> Result<()> {
        match self.active_tab_id.clone() {
            Some(tab_id) => self.close_tab(&tab_id),
            None => Ok(()),
        }
    }

    pub fn refresh_active_tab(&mut self) -> Result<()> {
        let Some(tab_id) = self.active_tab_id.clone() else {
            return Ok(());
        };

        self.reload_tab(&tab_id)?;
        tracing::info!(tab_id = %tab_id, "Reloading tab");

        Ok(())
    }

    // === Chrome ===

    /// Queue a clipboard write of the active tab's URL, returning the text
    pub fn copy_active_url(&mut self) -> Option<String> {
        let tab = self.active_tab()?;

        self.queue(HostCommand::WriteClipboard {
            text: tab.url.clone(),
        });
        Some(tab.url)
    }

    /// Host's answer to a `WriteClipboard` command
    pub fn clipboard_result(&mut self, ok: bool, now: DateTime<Utc>) {
        if ok {
            self.show_toast(COPY_SUCCESS_MESSAGE, now);
        } else {
            tracing::warn!("Clipboard write failed");
            self.show_toast(COPY_FAILURE_MESSAGE, now);
        }
    }

    /// Returns the new visibility
    pub fn toggle_sidebar(&mut self) -> Result<bool> {
        let visible = !self.chrome.sidebar_visible;
        self.chrome.sidebar_visible = visible;

        self.queue(HostCommand::SetTrafficLightsVisible { visible });
        self.db.set_sidebar_visible(visible)?;
        tracing::debug!(visible, "Sidebar toggled");

        Ok(visible)
    }

    pub fn show_toast(&mut self, message: &str, now: DateTime<Utc>) {
        self.chrome.toast.show(message, now);
    }

    // === Host input ===

    pub fn handle_content_event(
        &mut self,
        tab_id: &str,
        event: ContentEvent,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.tab_manager.contains(tab_id) {
            tracing::debug!(tab_id = %tab_id, ?event, "Ignoring event for unknown tab");
            return Ok(());
        }

        let is_active = self.is_active(tab_id);

        match event {
            ContentEvent::DidStartLoading => {
                self.apply_state(tab_id, TabState::Loading)?;
                if is_active {
                    self.chrome.loading.start();
                }
            }
            ContentEvent::DidFinishLoad => {
                self.apply_state(tab_id, TabState::Complete)?;
                if is_active {
                    self.chrome.loading.finish(now);
                }
            }
            ContentEvent::DomReady => {
                tracing::debug!(tab_id = %tab_id, "DOM ready");
            }
            ContentEvent::PageTitleUpdated { title } => {
                self.tab_manager.set_tab_title(tab_id, title)?;
            }
            ContentEvent::DidNavigate { url } => {
                let tab = self.tab_manager.set_tab_url(tab_id, url)?;
                if is_active {
                    self.chrome.address = tab.url;
                }
            }
            ContentEvent::FaviconUpdated { favicons } => {
                if let Some(favicon) = favicons.into_iter().next() {
                    self.tab_manager.set_tab_favicon(tab_id, Some(favicon))?;
                }
            }
            ContentEvent::DidFailLoad {
                error_code,
                description,
            } => {
                tracing::warn!(
                    tab_id = %tab_id,
                    error_code,
                    error = error_name(error_code),
                    description = %description,
                    "Page failed to load"
                );

                self.apply_state(tab_id, TabState::Failed)?;
                if is_active {
                    self.chrome.loading.finish(now);
                }
                if let Some(delay) = self.recovery.on_load_failure(error_code) {
                    self.schedule_reload(tab_id, now + std_millis(delay));
                }
            }
            ContentEvent::Crashed => {
                tracing::error!(tab_id = %tab_id, "Page crashed");

                self.apply_state(tab_id, TabState::Crashed)?;
                if is_active {
                    self.chrome.loading.reset();
                }
                self.show_toast(CRASH_MESSAGE, now);
                self.schedule_reload(tab_id, now + std_millis(self.recovery.on_crash()));
            }
            ContentEvent::ConsoleMessage { message } => {
                tracing::debug!(tab_id = %tab_id, message = %message, "Page console");
            }
            ContentEvent::NewWindowRequested { url } => {
                tracing::info!(tab_id = %tab_id, url = %url, "Opening popup as tab");
                self.create_tab(&url)?;
            }
        }

        Ok(())
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> Result<()> {
        tracing::debug!(shortcut = shortcut.id(), "Shortcut");

        match shortcut {
            Shortcut::NewTab => {
                self.open_new_tab()?;
            }
            Shortcut::CloseTab => self.close_active_tab()?,
            Shortcut::ToggleSidebar => {
                self.toggle_sidebar()?;
            }
            Shortcut::Reload => self.refresh_active_tab()?,
            // Nothing to copy is not a failure; no toast
            Shortcut::CopyUrl => {
                if self.copy_active_url().is_none() {
                    tracing::debug!("No active tab to copy from");
                }
            }
        }

        Ok(())
    }

    /// Settle expired timers. Returns true if anything visible changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let mut changed = self.chrome.tick(now);

        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_reloads)
            .into_iter()
            .partition(|reload| reload.due <= now);
        self.pending_reloads = waiting;

        for reload in due {
            if !self.tab_manager.contains(&reload.tab_id) {
                continue;
            }

            self.reload_tab(&reload.tab_id)?;
            tracing::info!(tab_id = %reload.tab_id, "Reloading tab after failure");
            changed = true;
        }

        Ok(changed)
    }

    // === Extensions ===

    pub fn load_extension(&self, path: &Path) -> Result<Extension> {
        Ok(self.extension_manager.load_extension(path)?)
    }

    pub fn extensions(&self) -> Vec<Extension> {
        self.extension_manager.loaded()
    }

    pub fn extensions_path(&self) -> &Path {
        self.extension_manager.extensions_path()
    }

    pub fn content_scripts_for(&self, url: &str) -> Vec<String> {
        self.extension_manager.content_scripts_for(url)
    }

    /// Stops injecting the extension's scripts into future page loads
    pub fn unload_extension(&self, extension_id: &str) -> Option<Extension> {
        self.extension_manager.unload(extension_id)
    }

    // === Views ===

    pub fn snapshot(&self) -> ChromeSnapshot {
        let active = self.active_tab_id.as_deref();

        ChromeSnapshot {
            tabs: self
                .tab_manager
                .ordered_tabs()
                .iter()
                .map(|tab| TabSummary::from_tab(tab, Some(tab.id.as_str()) == active))
                .collect(),
            active_tab_id: self.active_tab_id.clone(),
            address: self.chrome.address.clone(),
            sidebar_visible: self.chrome.sidebar_visible,
            toast: self
                .chrome
                .toast
                .current()
                .map(|toast| toast.message.clone()),
            loading: self.chrome.loading.phase(),
        }
    }

    /// Take every queued host command, oldest first
    pub fn drain_host_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.active_tab_id
            .as_deref()
            .and_then(|id| self.tab_manager.get_tab(id).ok())
    }

    pub fn tab(&self, tab_id: &str) -> Result<Tab> {
        Ok(self.tab_manager.get_tab(tab_id)?)
    }

    pub fn tabs(&self) -> Vec<Tab> {
        self.tab_manager.ordered_tabs()
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // === Internals ===

    fn queue(&mut self, command: HostCommand) {
        self.outbox.push(command);
    }

    fn is_active(&self, tab_id: &str) -> bool {
        self.active_tab_id.as_deref() == Some(tab_id)
    }

    fn reload_tab(&mut self, tab_id: &str) -> Result<()> {
        self.apply_state(tab_id, TabState::Loading)?;
        if self.is_active(tab_id) {
            self.chrome.loading.start();
        }
        self.queue(HostCommand::Reload {
            tab_id: tab_id.to_string(),
        });
        Ok(())
    }

    fn schedule_reload(&mut self, tab_id: &str, due: DateTime<Utc>) {
        self.pending_reloads.retain(|reload| reload.tab_id != tab_id);
        self.pending_reloads.push(PendingReload {
            tab_id: tab_id.to_string(),
            due,
        });
        tracing::debug!(tab_id = %tab_id, due = %due, "Reload scheduled");
    }

    /// Host events can arrive out of order; a stale transition is logged and dropped
    fn apply_state(&self, tab_id: &str, state: TabState) -> Result<()> {
        let result = match state {
            TabState::Loading => self.tab_manager.start_loading(tab_id),
            TabState::Complete => self.tab_manager.finish_loading(tab_id),
            TabState::Failed => self.tab_manager.fail_loading(tab_id),
            TabState::Crashed => self.tab_manager.mark_crashed(tab_id),
        };

        match result {
            Ok(_) => Ok(()),
            Err(TabError::InvalidTransition { from, to, .. }) => {
                tracing::debug!(tab_id = %tab_id, %from, %to, "Ignoring stale state change");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Clamped to a day so a silly config value cannot overflow
fn millis(ms: u64) -> Duration {
    Duration::milliseconds(ms.min(86_400_000) as i64)
}

fn std_millis(delay: std::time::Duration) -> Duration {
    millis(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}
