//! Tab load-lifecycle state machine
//!
//! ```text
//!            start                finish
//! (created) ──────▶ Loading ─────────────▶ Complete
//!                    │  ▲  ◀──────────────── │
//!               fail │  │ reload / navigate  │ fail
//!                    ▼  │                    ▼
//!                   Failed ◀─────────────────┘
//!
//! Loading | Complete | Failed ── crash ──▶ Crashed ── reload ──▶ Loading
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// The view is fetching or rendering a document
    Loading,
    /// The last load finished
    Complete,
    /// The last load failed
    Failed,
    /// The content process died; only a reload leaves this state
    Crashed,
}

impl TabState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TabState) -> bool {
        match (self, target) {
            (a, b) if *a == b => true,
            (TabState::Loading, TabState::Complete) => true,
            (TabState::Loading, TabState::Failed) => true,
            (TabState::Complete, TabState::Loading) => true,
            (TabState::Complete, TabState::Failed) => true,
            (TabState::Failed, TabState::Loading) => true,
            (TabState::Crashed, TabState::Loading) => true,
            (_, TabState::Crashed) => true,
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, TabState::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Loading => "loading",
            TabState::Complete => "complete",
            TabState::Failed => "failed",
            TabState::Crashed => "crashed",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loading" => Ok(TabState::Loading),
            "complete" => Ok(TabState::Complete),
            "failed" => Ok(TabState::Failed),
            "crashed" => Ok(TabState::Crashed),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}
