//! Extension manifest
//!
//! The subset of the `manifest.json` format the shell acts on. Unknown keys
//! are ignored so real-world manifests load without complaint.

use serde::{Deserialize, Serialize};

use crate::error::ExtensionError;
use crate::Result;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: u8,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub host_permissions: Vec<String>,
    #[serde(default)]
    pub content_scripts: Vec<ContentScriptDecl>,
}

/// One `content_scripts` entry: which pages, which files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentScriptDecl {
    pub matches: Vec<String>,
    #[serde(default)]
    pub js: Vec<String>,
    #[serde(default)]
    pub run_at: Option<String>,
}

impl Manifest {
    pub fn parse(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.manifest_version, 2 | 3) {
            return Err(ExtensionError::UnsupportedManifestVersion(
                self.manifest_version,
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ExtensionError::MissingField("name"));
        }
        if self.version.trim().is_empty() {
            return Err(ExtensionError::MissingField("version"));
        }

        // 1 to 4 dot-separated integers
        let parts: Vec<&str> = self.version.split('.').collect();
        if parts.len() > 4 || parts.iter().any(|part| part.parse::<u32>().is_err()) {
            return Err(ExtensionError::InvalidVersion(self.version.clone()));
        }

        for script in &self.content_scripts {
            if script.matches.is_empty() {
                return Err(ExtensionError::MissingField("content_scripts.matches"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let manifest =
            Manifest::parse(r#"{"manifest_version": 3, "name": "Dark", "version": "1.0"}"#)
                .unwrap();
        assert_eq!(manifest.name, "Dark");
        assert!(manifest.content_scripts.is_empty());
    }

    #[test]
    fn test_parse_content_scripts_and_unknown_keys() {
        let manifest = Manifest::parse(
            r#"{
                "manifest_version": 3,
                "name": "Highlighter",
                "version": "2.1.0.4",
                "icons": {"16": "icon16.png"},
                "content_scripts": [
                    {"matches": ["*://*.example.com/*"], "js": ["content.js"], "run_at": "document_end"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.content_scripts.len(), 1);
        assert_eq!(manifest.content_scripts[0].js, vec!["content.js"]);
    }

    #[test]
    fn test_invalid_versions() {
        for version in ["", "1.x", "1.2.3.4.5", "v1"] {
            let manifest = Manifest {
                manifest_version: 3,
                name: "Test".to_string(),
                version: version.to_string(),
                description: None,
                permissions: Vec::new(),
                host_permissions: Vec::new(),
                content_scripts: Vec::new(),
            };
            assert!(manifest.validate().is_err(), "{version:?} accepted");
        }
    }

    #[test]
    fn test_manifest_version_checked() {
        let result = Manifest::parse(r#"{"manifest_version": 1, "name": "Old", "version": "1"}"#);
        assert!(matches!(
            result,
            Err(ExtensionError::UnsupportedManifestVersion(1))
        ));
    }

    #[test]
    fn test_missing_name_is_a_parse_error() {
        let result = Manifest::parse(r#"{"manifest_version": 3, "version": "1"}"#);
        assert!(matches!(result, Err(ExtensionError::InvalidManifest(_))));
    }
}
