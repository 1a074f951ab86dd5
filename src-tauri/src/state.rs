//! Application state management
use parking_lot::RwLock;
use std::sync::Arc;
use wisp_core::{Browser, CommandQueue, Config, Result, WindowConfig};

/// Thread-safe application state wrapper
pub struct AppState {
    browser: Arc<RwLock<Browser>>,
    /// Host commands in the order the browser issued them
    commands: CommandQueue,
    window: WindowConfig,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::load(&Config::data_dir())?;
        let window = config.window;
        let browser = Browser::new(config)?;

        Ok(Self {
            browser: Arc::new(RwLock::new(browser)),
            commands: CommandQueue::new(),
            window,
        })
    }

    pub fn window_config(&self) -> WindowConfig {
        self.window
    }

    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    /// Run `f` with exclusive access to the browser. Whatever it queued for
    /// the host moves to the command queue before the lock is released.
    pub fn with_browser<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Browser) -> Result<T>,
    {
        let mut browser = self.browser.write();
        let result = f(&mut browser);
        self.commands.push_all(browser.drain_host_commands());
        result
    }

    /// Read-only access for queries that queue nothing
    pub fn read_browser<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Browser) -> T,
    {
        f(&self.browser.read())
    }
}
