//! Keyboard shortcuts handled by the shell

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shortcut {
    NewTab,
    CloseTab,
    ToggleSidebar,
    Reload,
    CopyUrl,
}

impl Shortcut {
    pub const ALL: [Shortcut; 5] = [
        Shortcut::NewTab,
        Shortcut::CloseTab,
        Shortcut::ToggleSidebar,
        Shortcut::Reload,
        Shortcut::CopyUrl,
    ];

    /// Stable identifier, used as the menu item id
    pub fn id(&self) -> &'static str {
        match self {
            Shortcut::NewTab => "new-tab",
            Shortcut::CloseTab => "close-tab",
            Shortcut::ToggleSidebar => "toggle-sidebar",
            Shortcut::Reload => "reload",
            Shortcut::CopyUrl => "copy-url",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shortcut::NewTab => "New Tab",
            Shortcut::CloseTab => "Close Tab",
            Shortcut::ToggleSidebar => "Toggle Sidebar",
            Shortcut::Reload => "Reload",
            Shortcut::CopyUrl => "Copy URL",
        }
    }

    pub fn accelerator(&self) -> &'static str {
        match self {
            Shortcut::NewTab => "CmdOrCtrl+T",
            Shortcut::CloseTab => "CmdOrCtrl+W",
            Shortcut::ToggleSidebar => "CmdOrCtrl+S",
            Shortcut::Reload => "CmdOrCtrl+R",
            Shortcut::CopyUrl => "CmdOrCtrl+Shift+C",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shortcut| shortcut.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_round_trip() {
        for shortcut in Shortcut::ALL {
            assert_eq!(Shortcut::from_id(shortcut.id()), Some(shortcut));
        }
        assert_eq!(Shortcut::from_id("quit"), None);
    }

    #[test]
    fn test_accelerators_are_distinct() {
        let accelerators: HashSet<&str> = Shortcut::ALL.iter().map(|s| s.accelerator()).collect();
        assert_eq!(accelerators.len(), Shortcut::ALL.len());
        assert_eq!(Shortcut::CloseTab.accelerator(), "CmdOrCtrl+W");
        assert_eq!(Shortcut::ToggleSidebar.accelerator(), "CmdOrCtrl+S");
    }
}
