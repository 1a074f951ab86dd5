//! A loaded, unpacked extension

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ExtensionError;
use crate::manifest::{ContentScriptDecl, Manifest, MANIFEST_FILE};
use crate::pattern::MatchPattern;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Extension {
    /// Directory name; stable across reloads
    pub id: String,
    pub path: PathBuf,
    pub manifest: Manifest,
    pub content_scripts: Vec<ContentScript>,
    pub loaded_at: DateTime<Utc>,
}

/// A content script with its files already read from disk
#[derive(Debug, Clone)]
pub struct ContentScript {
    pub matches: Vec<MatchPattern>,
    pub files: Vec<String>,
    pub source: String,
}

impl Extension {
    /// Read and validate the extension rooted at `path`
    pub fn from_dir(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(ExtensionError::NotFound(path.to_path_buf()));
        }

        let manifest_path = path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(ExtensionError::MissingManifest(path.to_path_buf()));
        }

        let manifest = Manifest::parse(&fs::read_to_string(&manifest_path)?)?;

        let content_scripts = manifest
            .content_scripts
            .iter()
            .map(|decl| ContentScript::load(path, decl))
            .collect::<Result<Vec<_>>>()?;

        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| manifest.name.clone());

        Ok(Self {
            id,
            path: path.to_path_buf(),
            manifest,
            content_scripts,
            loaded_at: Utc::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    /// Sources of this extension's scripts that apply to `url`
    pub fn scripts_for<'a>(&'a self, url: &'a Url) -> impl Iterator<Item = &'a str> + 'a {
        self.content_scripts
            .iter()
            .filter(move |script| script.matches_url(url))
            .map(|script| script.source.as_str())
    }
}

impl ContentScript {
    fn load(root: &Path, decl: &ContentScriptDecl) -> Result<Self> {
        let matches = decl
            .matches
            .iter()
            .map(|raw| {
                MatchPattern::parse(raw)
                    .ok_or_else(|| ExtensionError::InvalidMatchPattern(raw.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut sources = Vec::with_capacity(decl.js.len());
        for file in &decl.js {
            let script_path = root.join(file);
            if !script_path.is_file() {
                return Err(ExtensionError::MissingScript(script_path));
            }
            sources.push(fs::read_to_string(&script_path)?);
        }

        Ok(Self {
            matches,
            files: decl.js.clone(),
            source: sources.join("\n;\n"),
        })
    }

    pub fn matches_url(&self, url: &Url) -> bool {
        self.matches.iter().any(|pattern| pattern.matches(url))
    }
}
