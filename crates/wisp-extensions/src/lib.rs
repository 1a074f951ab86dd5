//! Wisp Extensions
//!
//! Unpacked extensions live one per directory under the extensions folder.
//! Loading one parses and validates its manifest and reads its content
//! scripts; the shell injects those into matching pages.

mod error;
mod extension;
mod manager;
mod manifest;
mod pattern;

pub use error::ExtensionError;
pub use extension::{ContentScript, Extension};
pub use manager::ExtensionManager;
pub use manifest::{ContentScriptDecl, Manifest, MANIFEST_FILE};
pub use pattern::MatchPattern;

pub type Result<T> = std::result::Result<T, ExtensionError>;
