//! Wisp Core
//!
//! Central coordination layer for the Wisp browser shell. The core owns all
//! state; webviews only render and report events.

mod browser;
mod chrome;
mod config;
mod error;
mod event;
mod host;
mod shortcut;
mod snapshot;

pub use browser::{Browser, COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE};
pub use chrome::{Chrome, LoadingIndicator, LoadingPhase, Toast, ToastMessage};
pub use config::{Config, WindowConfig, CONFIG_FILE};
pub use error::CoreError;
pub use event::ContentEvent;
pub use host::{CommandQueue, Drain, HostCommand};
pub use shortcut::Shortcut;
pub use snapshot::{ChromeSnapshot, TabSummary};

// Re-export core components
pub use wisp_extensions::{Extension, ExtensionError, ExtensionManager, Manifest};
pub use wisp_navigation::{format_url, normalize_url, NavigationError, RecoveryPolicy};
pub use wisp_storage::{Database, StorageError};
pub use wisp_tabs::{Tab, TabError, TabManager, TabState};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
