//! Serialisable view of the shell for the UI layer

use serde::{Deserialize, Serialize};

use wisp_tabs::{Tab, TabState};

use crate::chrome::LoadingPhase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSummary {
    pub id: String,
    pub url: String,
    /// Title as the tab strip shows it
    pub title: String,
    pub favicon_url: Option<String>,
    pub state: TabState,
    pub is_loading: bool,
    pub is_active: bool,
}

impl TabSummary {
    pub fn from_tab(tab: &Tab, is_active: bool) -> Self {
        Self {
            id: tab.id.clone(),
            url: tab.url.clone(),
            title: tab.display_title().to_string(),
            favicon_url: tab.favicon_url.clone(),
            state: tab.state,
            is_loading: tab.is_loading(),
            is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeSnapshot {
    /// Tabs in strip order
    pub tabs: Vec<TabSummary>,
    pub active_tab_id: Option<String>,
    pub address: String,
    pub sidebar_visible: bool,
    pub toast: Option<String>,
    pub loading: LoadingPhase,
}

impl ChromeSnapshot {
    pub fn active_tab(&self) -> Option<&TabSummary> {
        self.tabs.iter().find(|tab| tab.is_active)
    }
}
