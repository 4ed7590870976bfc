//! Client-side search payload (`search.json`).

use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output file name of the search payload
pub const SEARCH_FILE: &str = "search.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String, // Blog/Event/Podcast
    pub url: String,
    pub description: String,
}

impl SearchEntry {
    pub fn for_document(doc: &Document) -> Self {
        Self {
            title: doc.title().to_string(),
            doc_type: doc.kind.search_label().to_string(),
            url: doc.url(),
            description: doc.description.clone(),
        }
    }
}

/// Entries from every collection, in discovery order
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SearchEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    /// Write the payload to `<output_dir>/search.json`
    pub fn write(&self, output_dir: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(output_dir.join(SEARCH_FILE), json)
    }
}
