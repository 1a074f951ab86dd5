//! Shell database
//!
//! One SQLite connection holds the persisted tab strip and the two shell
//! preferences that outlive a session: sidebar visibility and the active tab.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::Result;

const SIDEBAR_VISIBLE: &str = "sidebar_visible";
const ACTIVE_TAB_ID: &str = "active_tab_id";

/// Cheap to clone; every clone talks to the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "Opened shell database");

        Self::prepare(conn)
    }

    /// Nothing survives the process; used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection; the tab registry stores its rows here
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.conn.lock())
    }

    /// `None` until the sidebar has been toggled once
    pub fn sidebar_visible(&self) -> Result<Option<bool>> {
        Ok(self.setting(SIDEBAR_VISIBLE)?.map(|value| value != "false"))
    }

    pub fn set_sidebar_visible(&self, visible: bool) -> Result<()> {
        self.store_setting(SIDEBAR_VISIBLE, if visible { "true" } else { "false" })
    }

    /// Tab that was active when the shell last ran. It may since have closed.
    pub fn active_tab_id(&self) -> Result<Option<String>> {
        self.setting(ACTIVE_TAB_ID)
    }

    pub fn set_active_tab_id(&self, tab_id: &str) -> Result<()> {
        self.store_setting(ACTIVE_TAB_ID, tab_id)
    }

    fn setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?)
        })
    }

    fn store_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(())
        })
    }
}
