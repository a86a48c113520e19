//! Item index files
//!
//! An index is a list of entries, either TOML (`[[items]]` tables) or JSON
//! (a bare array or `{ "items": [...] }`), picked by file extension.

use anyhow::{Context, Result, bail};
use search_bar::{ItemProvider, SearchItem};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry as written in an index file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Identifier printed on selection; defaults to the title
    #[serde(default)]
    pub id: Option<String>,
}

impl From<IndexEntry> for SearchItem<String> {
    fn from(entry: IndexEntry) -> Self {
        let id = entry.id.unwrap_or_else(|| entry.title.clone());
        let mut item = SearchItem::new(entry.title, id).with_keywords(entry.keywords);
        item.subtitle = entry.subtitle;
        item.group = entry.group;
        item
    }
}

#[derive(Debug, Deserialize)]
struct IndexFile {
    #[serde(default)]
    items: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonIndex {
    Bare(Vec<IndexEntry>),
    Wrapped(IndexFile),
}

/// Items loaded from one index file
#[derive(Debug)]
pub struct FileItems {
    name: String,
    items: Vec<SearchItem<String>>,
}

impl FileItems {
    pub fn new(name: impl Into<String>, entries: Vec<IndexEntry>) -> Self {
        Self {
            name: name.into(),
            items: entries.into_iter().map(SearchItem::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemProvider<String> for FileItems {
    fn items(&self) -> Vec<SearchItem<String>> {
        self.items.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse index content in the given format ("toml" or "json")
pub fn parse_index(content: &str, format: &str) -> Result<Vec<IndexEntry>> {
    let entries = match format {
        "toml" => toml::from_str::<IndexFile>(content)?.items,
        "json" => match serde_json::from_str::<JsonIndex>(content)? {
            JsonIndex::Bare(entries) => entries,
            JsonIndex::Wrapped(file) => file.items,
        },
        other => bail!("unsupported index format {:?} (expected toml or json)", other),
    };
    Ok(entries)
}

/// Load an index file, choosing the format from its extension
pub fn load_index(path: &Path) -> Result<FileItems> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index file {}", path.display()))?;
    let entries = parse_index(&content, &format)
        .with_context(|| format!("Failed to parse index file {}", path.display()))?;

    log::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(FileItems::new(path.display().to_string(), entries))
}
