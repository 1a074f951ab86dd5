//! Wisp Tab Management
//!
//! The tab registry: a mapping from tab identifier to tab record, kept in
//! strip order and persisted so the strip survives a restart.

mod error;
mod manager;
mod state;
mod tab;

pub use error::TabError;
pub use manager::TabManager;
pub use state::TabState;
pub use tab::{Tab, PLACEHOLDER_TITLE};

pub type Result<T> = std::result::Result<T, TabError>;
