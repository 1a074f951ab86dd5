//! Tab data structure
//!
//! A tab strip entry shows:
//! - Favicon
//! - Title (placeholder while the first load is in flight)
//! - Close button

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TabError;
use crate::state::TabState;
use crate::Result;

/// Title shown for a tab whose page has not reported one yet.
pub const PLACEHOLDER_TITLE: &str = "Loading...";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Current URL
    pub url: String,
    /// Page title, empty until the page reports one
    pub title: String,
    /// First favicon the page advertised
    pub favicon_url: Option<String>,
    /// Load lifecycle of the backing view
    pub state: TabState,
    /// Sort key in the tab strip
    pub position: i64,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Last time the tab was activated
    pub last_accessed_at: DateTime<Utc>,
}

impl Tab {
    pub fn new(url: String) -> Result<Self> {
        if url.is_empty() {
            return Err(TabError::EmptyUrl);
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            url,
            title: String::new(),
            favicon_url: None,
            state: TabState::Loading,
            position: 0,
            created_at: now,
            updated_at: now,
            last_accessed_at: now,
        })
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: TabState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                tab_id: self.id.clone(),
                from: self.state,
                to: new_state,
            });
        }

        if self.state != new_state {
            tracing::debug!(
                tab_id = %self.id,
                from = %self.state,
                to = %new_state,
                "Tab state transition"
            );
        }

        self.state = new_state;
        self.updated_at = Utc::now();

        Ok(())
    }

    pub fn start_loading(&mut self) -> Result<()> {
        self.transition_to(TabState::Loading)
    }

    pub fn finish_loading(&mut self) -> Result<()> {
        self.transition_to(TabState::Complete)
    }

    pub fn fail(&mut self) -> Result<()> {
        self.transition_to(TabState::Failed)
    }

    pub fn crash(&mut self) -> Result<()> {
        self.transition_to(TabState::Crashed)
    }

    /// Record that the tab was brought to the front
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// User-initiated navigation
    pub fn navigate(&mut self, url: String) -> Result<()> {
        if url.is_empty() {
            return Err(TabError::EmptyUrl);
        }

        self.start_loading()?;
        self.url = url;
        self.title = String::new(); // Reset title until page loads

        Ok(())
    }

    /// URL committed by the view (redirects, in-page links)
    pub fn set_url(&mut self, url: String) {
        self.url = url;
        self.updated_at = Utc::now();
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn set_favicon(&mut self, url: Option<String>) {
        self.favicon_url = url;
        self.updated_at = Utc::now();
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Title for the tab strip: page title, placeholder while loading, else URL
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if self.is_loading() {
            PLACEHOLDER_TITLE
        } else {
            &self.url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab() -> Tab {
        Tab::new("https://example.com".to_string()).unwrap()
    }

    #[test]
    fn test_new_tab() {
        let tab = tab();
        assert_eq!(tab.state, TabState::Loading);
        assert_eq!(tab.url, "https://example.com");
        assert!(tab.title.is_empty());
        assert_eq!(tab.display_title(), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(tab().id, tab().id);
    }

    #[test]
    fn test_load_lifecycle() {
        let mut tab = tab();

        tab.finish_loading().unwrap();
        assert_eq!(tab.state, TabState::Complete);
        assert_eq!(tab.display_title(), "https://example.com");

        tab.set_title("Example Domain".to_string());
        assert_eq!(tab.display_title(), "Example Domain");

        tab.crash().unwrap();
        assert!(matches!(
            tab.finish_loading(),
            Err(TabError::InvalidTransition {
                from: TabState::Crashed,
                to: TabState::Complete,
                ..
            })
        ));
        assert_eq!(tab.state, TabState::Crashed);

        tab.start_loading().unwrap();
        tab.fail().unwrap();
        assert_eq!(tab.state, TabState::Failed);
    }

    #[test]
    fn test_navigate_resets_title() {
        let mut tab = tab();
        tab.finish_loading().unwrap();
        tab.set_title("Example Domain".to_string());

        tab.navigate("https://rust-lang.org".to_string()).unwrap();
        assert_eq!(tab.url, "https://rust-lang.org");
        assert!(tab.title.is_empty());
        assert!(tab.is_loading());
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(Tab::new(String::new()), Err(TabError::EmptyUrl)));
        assert!(matches!(
            tab().navigate(String::new()),
            Err(TabError::EmptyUrl)
        ));
    }
}
