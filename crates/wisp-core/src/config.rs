//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use wisp_navigation::RecoveryPolicy;

use crate::error::CoreError;
use crate::Result;

pub const CONFIG_FILE: &str = "config.json";

const APP_DIR: &str = "Wisp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Folder scanned for unpacked extensions
    pub extensions_dir: PathBuf,
    /// URL opened by new tabs and when the last tab closes
    pub homepage: String,
    /// Reopen the previous tab strip on startup
    pub restore_tabs: bool,
    /// Load every extension in `extensions_dir` on startup
    pub autoload_extensions: bool,
    /// How long a toast stays up
    pub toast_duration_ms: u64,
    /// How long the finished loading bar lingers before it resets
    pub loading_settle_ms: u64,
    /// Delay before retrying an aborted load
    pub abort_retry_ms: u64,
    /// Delay before reloading a crashed page
    pub crash_reload_ms: u64,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
            min_width: 800.0,
            min_height: 600.0,
        }
    }
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("wisp.db"),
            extensions_dir: data_dir.join("extensions"),
            homepage: "https://www.google.com".to_string(),
            restore_tabs: true,
            autoload_extensions: true,
            toast_duration_ms: 3000,
            loading_settle_ms: 700,
            abort_retry_ms: 100,
            crash_reload_ms: 1000,
            window: WindowConfig::default(),
        }
    }

    /// Defaults for `data_dir`, overlaid with `data_dir/config.json` if present
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let defaults = Self::new(data_dir.to_path_buf());

        if !path.is_file() {
            return Ok(defaults);
        }

        let raw = std::fs::read_to_string(&path)?;
        let overlay: serde_json::Value = serde_json::from_str(&raw)?;
        let mut merged = serde_json::to_value(&defaults)?;

        match (&mut merged, overlay) {
            (serde_json::Value::Object(base), serde_json::Value::Object(values)) => {
                for (key, value) in values {
                    base.insert(key, value);
                }
            }
            _ => {
                return Err(CoreError::Config(format!(
                    "{} must contain a JSON object",
                    path.display()
                )))
            }
        }

        let config: Config = serde_json::from_value(merged)?;
        tracing::info!(path = %path.display(), "Loaded configuration overrides");
        Ok(config)
    }

    /// Per-user data folder, `./.wisp` when the platform has none
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".wisp"))
    }

    pub fn recovery_policy(&self) -> RecoveryPolicy {
        RecoveryPolicy::new(
            Duration::from_millis(self.abort_retry_ms),
            Duration::from_millis(self.crash_reload_ms),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/data"));
        assert_eq!(config.database_path, PathBuf::from("/data/wisp.db"));
        assert_eq!(config.extensions_dir, PathBuf::from("/data/extensions"));
        assert_eq!(config.homepage, "https://www.google.com");
        assert_eq!(config.window.width, 1600.0);
        assert_eq!(config.window.height, 1000.0);
        assert_eq!(
            config.recovery_policy(),
            RecoveryPolicy::default()
        );
    }

    #[test]
    fn test_data_dir_is_app_folder() {
        let dir = Config::data_dir();
        match dirs::data_local_dir() {
            Some(base) => assert_eq!(dir, base.join("Wisp")),
            None => assert_eq!(dir, PathBuf::from(".wisp")),
        }
    }

    #[test]
    fn test_load_without_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config, Config::new(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{"homepage": "https://duckduckgo.com", "restore_tabs": false, "window": {"width": 1280}}"#,
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.homepage, "https://duckduckgo.com");
        assert!(!config.restore_tabs);
        assert_eq!(config.window.width, 1280.0);
        // Nested defaults survive a partial override
        assert_eq!(config.window.height, 1000.0);
        assert_eq!(config.database_path, tmp.path().join("wisp.db"));
    }

    #[test]
    fn test_load_rejects_non_object() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "[1, 2]").unwrap();
        assert!(Config::load(tmp.path()).is_err());
    }
}
