//! Tab registry errors

use thiserror::Error;

use crate::state::TabState;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("No tab with id {0}")]
    NotFound(String),

    /// A load event the tab's lifecycle does not allow, e.g. a finish after a crash
    #[error("Tab {tab_id} cannot go from {from} to {to}")]
    InvalidTransition {
        tab_id: String,
        from: TabState,
        to: TabState,
    },

    #[error("A tab needs a non-empty URL")]
    EmptyUrl,

    #[error("Tab strip could not be persisted: {0}")]
    Storage(#[from] wisp_storage::StorageError),
}
