//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] wisp_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] wisp_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] wisp_navigation::NavigationError),

    #[error("Extension error: {0}")]
    Extension(#[from] wisp_extensions::ExtensionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Browser not initialized")]
    NotInitialized,
}
