//! Extension Manager
//!
//! Tracks the extensions folder and every extension loaded from it (or
//! from anywhere else the user points at).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::extension::Extension;
use crate::manifest::MANIFEST_FILE;
use crate::Result;

pub struct ExtensionManager {
    root: PathBuf,
    extensions: Arc<RwLock<HashMap<String, Extension>>>,
}

impl ExtensionManager {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Make sure the extensions folder exists
    pub fn initialize(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            tracing::info!(path = %self.root.display(), "Created extensions directory");
        }
        Ok(())
    }

    pub fn extensions_path(&self) -> &Path {
        &self.root
    }

    /// Load (or reload) the unpacked extension at `path`
    pub fn load_extension(&self, path: &Path) -> Result<Extension> {
        match Extension::from_dir(path) {
            Ok(extension) => {
                tracing::info!(
                    extension_id = %extension.id,
                    name = %extension.name(),
                    version = %extension.version(),
                    content_scripts = extension.content_scripts.len(),
                    "Extension loaded"
                );
                self.extensions
                    .write()
                    .insert(extension.id.clone(), extension.clone());
                Ok(extension)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load extension");
                Err(e)
            }
        }
    }

    /// Load every extension directory under the extensions folder.
    /// Broken extensions are skipped.
    pub fn load_all(&self) -> Vec<Extension> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.root.display(), error = %e, "Cannot read extensions directory");
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.join(MANIFEST_FILE).is_file())
            .collect();
        dirs.sort();

        dirs.iter()
            .filter_map(|dir| self.load_extension(dir).ok())
            .collect()
    }

    /// Loaded extensions, sorted by id
    pub fn loaded(&self) -> Vec<Extension> {
        let mut extensions: Vec<Extension> = self.extensions.read().values().cloned().collect();
        extensions.sort_by(|a, b| a.id.cmp(&b.id));
        extensions
    }

    pub fn get(&self, id: &str) -> Option<Extension> {
        self.extensions.read().get(id).cloned()
    }

    pub fn unload(&self, id: &str) -> Option<Extension> {
        let removed = self.extensions.write().remove(id);
        if removed.is_some() {
            tracing::info!(extension_id = %id, "Extension unloaded");
        }
        removed
    }

    /// Content-script sources to inject into a page at `url`
    pub fn content_scripts_for(&self, url: &str) -> Vec<String> {
        let Ok(parsed) = Url::parse(url) else {
            return Vec::new();
        };

        self.loaded()
            .iter()
            .flat_map(|extension| {
                extension
                    .scripts_for(&parsed)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl Clone for ExtensionManager {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            extensions: Arc::clone(&self.extensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_extension(root: &Path, dir_name: &str, name: &str, script: Option<&str>) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();

        let manifest = match script {
            Some(_) => format!(
                r#"{{"manifest_version": 3, "name": "{name}", "version": "1.0",
                    "content_scripts": [{{"matches": ["<all_urls>"], "js": ["content.js"]}}]}}"#
            ),
            None => format!(r#"{{"manifest_version": 3, "name": "{name}", "version": "1.0"}}"#),
        };
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();

        if let Some(source) = script {
            fs::write(dir.join("content.js"), source).unwrap();
        }
    }

    #[test]
    fn test_initialize_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("extensions");
        let manager = ExtensionManager::new(root.clone());

        manager.initialize().unwrap();
        assert!(root.is_dir());
        assert_eq!(manager.extensions_path(), root.as_path());

        // Second call is a no-op
        manager.initialize().unwrap();
    }

    #[test]
    fn test_load_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        write_extension(tmp.path(), "dark", "Dark Mode", None);
        let manager = ExtensionManager::new(tmp.path().to_path_buf());

        let first = manager.load_extension(&tmp.path().join("dark")).unwrap();
        assert_eq!(first.id, "dark");

        write_extension(tmp.path(), "dark", "Dark Mode Pro", None);
        manager.load_extension(&tmp.path().join("dark")).unwrap();

        let loaded = manager.loaded();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "Dark Mode Pro");
    }

    #[test]
    fn test_failed_load_is_not_registered() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = ExtensionManager::new(tmp.path().to_path_buf());

        assert!(manager.load_extension(&tmp.path().join("missing")).is_err());
        assert!(manager.loaded().is_empty());
    }

    #[test]
    fn test_load_all_skips_broken() {
        let tmp = tempfile::tempdir().unwrap();
        write_extension(tmp.path(), "a-good", "Good", Some("window.good = true;"));
        write_extension(tmp.path(), "b-broken", "", None);
        fs::create_dir_all(tmp.path().join("c-not-an-extension")).unwrap();

        let manager = ExtensionManager::new(tmp.path().to_path_buf());
        let loaded = manager.load_all();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a-good");
        assert!(manager.get("b-broken").is_none());
    }

    #[test]
    fn test_content_scripts_for() {
        let tmp = tempfile::tempdir().unwrap();
        write_extension(tmp.path(), "a", "A", Some("window.a = 1;"));
        write_extension(tmp.path(), "b", "B", Some("window.b = 2;"));

        let manager = ExtensionManager::new(tmp.path().to_path_buf());
        manager.load_all();

        let scripts = manager.content_scripts_for("https://example.com/");
        assert_eq!(scripts, vec!["window.a = 1;", "window.b = 2;"]);

        assert!(manager.content_scripts_for("about:blank").is_empty());
        assert!(manager.content_scripts_for("not a url").is_empty());

        manager.unload("a");
        assert_eq!(
            manager.content_scripts_for("https://example.com/"),
            vec!["window.b = 2;"]
        );
    }

    #[test]
    fn test_load_all_without_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = ExtensionManager::new(tmp.path().join("absent"));
        assert!(manager.load_all().is_empty());
    }
}
