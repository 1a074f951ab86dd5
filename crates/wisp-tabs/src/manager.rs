//! Tab Manager
//!
//! Owns every open tab, in strip order, with write-through persistence.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use wisp_storage::Database;

use crate::error::TabError;
use crate::state::TabState;
use crate::tab::Tab;
use crate::Result;

/// Records and strip order live under one lock so they never disagree.
#[derive(Default)]
struct Registry {
    tabs: HashMap<String, Tab>,
    order: Vec<String>,
}

pub struct TabManager {
    registry: Arc<RwLock<Registry>>,
    /// Database for persistence
    db: Database,
}

impl TabManager {
    pub fn new(db: Database) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
            db,
        }
    }

    /// Replace the in-memory registry with the persisted tab strip
    pub fn load_tabs(&self) -> Result<Vec<Tab>> {
        let tabs: Vec<Tab> = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, title, favicon_url, state, position,
                        created_at, updated_at, last_accessed_at
                 FROM tabs ORDER BY position, created_at",
            )?;

            let tabs: Vec<Tab> = stmt
                .query_map([], |row| {
                    let state_str: String = row.get(4)?;
                    let state: TabState = state_str.parse().unwrap_or(TabState::Loading);

                    let created_str: String = row.get(6)?;
                    let updated_str: String = row.get(7)?;
                    let accessed_str: String = row.get(8)?;

                    Ok(Tab {
                        id: row.get(0)?,
                        url: row.get(1)?,
                        title: row.get(2)?,
                        favicon_url: row.get(3)?,
                        state,
                        position: row.get(5)?,
                        created_at: parse_timestamp(&created_str),
                        updated_at: parse_timestamp(&updated_str),
                        last_accessed_at: parse_timestamp(&accessed_str),
                    })
                })?
                .filter_map(|row| match row {
                    Ok(tab) => Some(tab),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping unreadable persisted tab");
                        None
                    }
                })
                .collect();

            Ok(tabs)
        })?;

        {
            let mut registry = self.registry.write();
            registry.tabs.clear();
            registry.order.clear();
            for tab in &tabs {
                registry.order.push(tab.id.clone());
                registry.tabs.insert(tab.id.clone(), tab.clone());
            }
        }

        tracing::debug!(count = tabs.len(), "Loaded persisted tabs");

        Ok(tabs)
    }

    /// Create a new tab at the end of the strip
    pub fn create_tab(&self, url: String) -> Result<Tab> {
        let mut tab = Tab::new(url)?;

        let mut registry = self.registry.write();
        tab.position = registry
            .order
            .last()
            .and_then(|id| registry.tabs.get(id))
            .map(|last| last.position + 1)
            .unwrap_or(0);

        self.save_tab(&tab)?;

        registry.order.push(tab.id.clone());
        registry.tabs.insert(tab.id.clone(), tab.clone());

        tracing::info!(tab_id = %tab.id, url = %tab.url, "Created new tab");

        Ok(tab)
    }

    /// Get a tab by ID
    pub fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.registry
            .read()
            .tabs
            .get(tab_id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.registry.read().tabs.contains_key(tab_id)
    }

    pub fn len(&self) -> usize {
        self.registry.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().order.is_empty()
    }

    /// All tabs in strip order
    pub fn ordered_tabs(&self) -> Vec<Tab> {
        let registry = self.registry.read();
        registry
            .order
            .iter()
            .filter_map(|id| registry.tabs.get(id).cloned())
            .collect()
    }

    pub fn tab_ids(&self) -> Vec<String> {
        self.registry.read().order.clone()
    }

    /// Right-most tab in the strip
    pub fn last_tab_id(&self) -> Option<String> {
        self.registry.read().order.last().cloned()
    }

    /// Write back a modified tab
    pub fn update_tab(&self, tab: &Tab) -> Result<()> {
        let mut registry = self.registry.write();
        if !registry.tabs.contains_key(&tab.id) {
            return Err(TabError::NotFound(tab.id.clone()));
        }

        self.save_tab(tab)?;
        registry.tabs.insert(tab.id.clone(), tab.clone());
        Ok(())
    }

    /// Close a tab, returning its last record
    pub fn close_tab(&self, tab_id: &str) -> Result<Tab> {
        let mut registry = self.registry.write();
        if !registry.tabs.contains_key(tab_id) {
            return Err(TabError::NotFound(tab_id.to_string()));
        }

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM tabs WHERE id = ?1", [tab_id])?;
            Ok(())
        })?;

        registry.order.retain(|id| id != tab_id);
        let tab = registry
            .tabs
            .remove(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        tracing::debug!(tab_id = %tab_id, "Removed tab record");

        Ok(tab)
    }

    /// Drop every tab, in memory and on disk
    pub fn clear(&self) -> Result<()> {
        let mut registry = self.registry.write();

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM tabs", [])?;
            Ok(())
        })?;

        registry.tabs.clear();
        registry.order.clear();
        Ok(())
    }

    /// Navigate a tab to a new URL
    pub fn navigate_tab(&self, tab_id: &str, url: String) -> Result<Tab> {
        self.modify(tab_id, |tab| tab.navigate(url))
    }

    pub fn set_tab_url(&self, tab_id: &str, url: String) -> Result<Tab> {
        self.modify(tab_id, |tab| {
            tab.set_url(url);
            Ok(())
        })
    }

    pub fn set_tab_title(&self, tab_id: &str, title: String) -> Result<Tab> {
        self.modify(tab_id, |tab| {
            tab.set_title(title);
            Ok(())
        })
    }

    pub fn set_tab_favicon(&self, tab_id: &str, favicon_url: Option<String>) -> Result<Tab> {
        self.modify(tab_id, |tab| {
            tab.set_favicon(favicon_url);
            Ok(())
        })
    }

    pub fn touch_tab(&self, tab_id: &str) -> Result<Tab> {
        self.modify(tab_id, |tab| {
            tab.touch();
            Ok(())
        })
    }

    pub fn start_loading(&self, tab_id: &str) -> Result<Tab> {
        self.modify(tab_id, Tab::start_loading)
    }

    pub fn finish_loading(&self, tab_id: &str) -> Result<Tab> {
        self.modify(tab_id, Tab::finish_loading)
    }

    pub fn fail_loading(&self, tab_id: &str) -> Result<Tab> {
        self.modify(tab_id, Tab::fail)
    }

    pub fn mark_crashed(&self, tab_id: &str) -> Result<Tab> {
        self.modify(tab_id, Tab::crash)
    }

    fn modify<F>(&self, tab_id: &str, f: F) -> Result<Tab>
    where
        F: FnOnce(&mut Tab) -> Result<()>,
    {
        let mut tab = self.get_tab(tab_id)?;
        f(&mut tab)?;
        self.update_tab(&tab)?;
        Ok(tab)
    }

    /// Save tab to database
    fn save_tab(&self, tab: &Tab) -> Result<()> {
        Ok(self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO tabs
                 (id, url, title, favicon_url, state, position,
                  created_at, updated_at, last_accessed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    tab.id,
                    tab.url,
                    tab.title,
                    tab.favicon_url,
                    tab.state.as_str(),
                    tab.position,
                    tab.created_at.to_rfc3339(),
                    tab.updated_at.to_rfc3339(),
                    tab.last_accessed_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?)
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            db: self.db.clone(),
        }
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TabManager {
        TabManager::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_tab_manager() {
        let manager = manager();

        let tab = manager
            .create_tab("https://example.com".to_string())
            .unwrap();
        assert_eq!(tab.state, TabState::Loading);

        let retrieved = manager.get_tab(&tab.id).unwrap();
        assert_eq!(retrieved.url, "https://example.com");

        let finished = manager.finish_loading(&tab.id).unwrap();
        assert_eq!(finished.state, TabState::Complete);

        let closed = manager.close_tab(&tab.id).unwrap();
        assert_eq!(closed.id, tab.id);
        assert!(manager.get_tab(&tab.id).is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_strip_order() {
        let manager = manager();
        let a = manager.create_tab("https://a.example".to_string()).unwrap();
        let b = manager.create_tab("https://b.example".to_string()).unwrap();
        let c = manager.create_tab("https://c.example".to_string()).unwrap();

        assert_eq!(manager.tab_ids(), vec![a.id.clone(), b.id.clone(), c.id.clone()]);
        assert_eq!(manager.last_tab_id(), Some(c.id.clone()));

        manager.close_tab(&c.id).unwrap();
        assert_eq!(manager.last_tab_id(), Some(b.id.clone()));

        // Positions keep growing after a close so order stays stable on reload
        let d = manager.create_tab("https://d.example".to_string()).unwrap();
        assert!(d.position > b.position);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_close_unknown_tab() {
        let manager = manager();
        assert!(matches!(
            manager.close_tab("missing"),
            Err(TabError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_unknown_tab() {
        let manager = manager();
        let orphan = Tab::new("https://example.com".to_string()).unwrap();
        assert!(matches!(
            manager.update_tab(&orphan),
            Err(TabError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_transition_leaves_tab_untouched() {
        let manager = manager();
        let tab = manager.create_tab("https://example.com".to_string()).unwrap();
        manager.mark_crashed(&tab.id).unwrap();

        assert!(manager.finish_loading(&tab.id).is_err());
        assert_eq!(manager.get_tab(&tab.id).unwrap().state, TabState::Crashed);
    }

    #[test]
    fn test_persisted_tabs_reload_in_order() {
        let db = Database::open_in_memory().unwrap();
        let manager = TabManager::new(db.clone());

        let a = manager.create_tab("https://a.example".to_string()).unwrap();
        let b = manager.create_tab("https://b.example".to_string()).unwrap();
        manager.set_tab_title(&b.id, "B".to_string()).unwrap();
        manager
            .set_tab_favicon(&b.id, Some("https://b.example/favicon.ico".to_string()))
            .unwrap();

        let restored = TabManager::new(db);
        let tabs = restored.load_tabs().unwrap();

        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].id, a.id);
        assert_eq!(tabs[1].title, "B");
        assert_eq!(
            tabs[1].favicon_url.as_deref(),
            Some("https://b.example/favicon.ico")
        );
        assert_eq!(restored.tab_ids(), vec![a.id, b.id]);
    }

    #[test]
    fn test_clear() {
        let db = Database::open_in_memory().unwrap();
        let manager = TabManager::new(db.clone());
        manager.create_tab("https://a.example".to_string()).unwrap();
        manager.clear().unwrap();

        assert!(manager.is_empty());
        assert!(TabManager::new(db).load_tabs().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let db = Database::open_in_memory().unwrap();
        let manager = TabManager::new(db.clone());
        let good = manager.create_tab("https://a.example".to_string()).unwrap();

        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO tabs (id, url, position, created_at, updated_at, last_accessed_at)
                 VALUES ('broken', 'https://b.example', 'not-a-number', '', '', '')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let restored = TabManager::new(db);
        let tabs = restored.load_tabs().unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].id, good.id);
        assert!(!restored.contains("broken"));
    }
}
