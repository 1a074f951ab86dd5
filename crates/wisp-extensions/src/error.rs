//! Extension error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Extension directory not found: {0}")]
    NotFound(PathBuf),

    #[error("No manifest.json in {0}")]
    MissingManifest(PathBuf),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),

    #[error("Manifest field missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Unsupported manifest version: {0}")]
    UnsupportedManifestVersion(u8),

    #[error("Invalid match pattern: {0}")]
    InvalidMatchPattern(String),

    #[error("Content script not found: {0}")]
    MissingScript(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
