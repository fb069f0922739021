//! Browser-window state around the document: location, local storage and viewport.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use url::Url;

use super::model::Document;

/// The page URL (`window.location`) with `history.replaceState`-style query edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(href)?,
        })
    }

    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// First value of query parameter `name`, if present.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn has_query_param(&self, name: &str) -> bool {
        self.url.query_pairs().any(|(k, _)| k == name)
    }

    /// Set query parameter `name` to `value`, keeping the other parameters in order.
    pub fn replace_query_param(&mut self, name: &str, value: &str) {
        let others: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(k, _)| k != name)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let mut pairs = self.url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(name, value);
    }

    /// Resolve `reference` against the page URL.
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        self.url.join(reference).ok()
    }
}

/// `window.localStorage`: a string map optionally persisted to a TOML file.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl Storage {
    /// Storage that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or start) a storage file. Unreadable files start empty.
    pub fn open(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), "ignoring unreadable storage file: {e}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store `value` under `key`; persistence failures are logged, not returned.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(path) = &self.path {
            if let Err(e) = persist(path, &self.entries) {
                warn!(path = %path.display(), "failed to persist storage: {e}");
            }
        }
    }
}

fn persist(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let text = toml::to_string(entries).map_err(std::io::Error::other)?;
    fs::write(path, text)
}

/// Viewport size and vertical scroll offset, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

/// Everything a widget can touch: the document and its surrounding window state.
#[derive(Debug, Clone)]
pub struct Window {
    pub document: Document,
    pub location: Location,
    pub storage: Storage,
    pub viewport: Viewport,
}

impl Window {
    pub fn new(document: Document, location: Location, storage: Storage) -> Self {
        Self {
            document,
            location,
            storage,
            viewport: Viewport::default(),
        }
    }

    /// Lock or release page scrolling (`documentElement.style.overflow`).
    pub fn lock_scroll(&mut self, locked: bool) {
        let root = self.document.document_element();
        self.document
            .set_style(root, "overflow", if locked { "hidden" } else { "" });
    }

    pub fn scroll_locked(&self) -> bool {
        let root = self.document.document_element();
        self.document.style(root, "overflow") == Some("hidden")
    }
}
