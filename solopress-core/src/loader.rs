//! Content discovery and raw document loading.

use crate::frontmatter::split_frontmatter;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extension of content files
pub const CONTENT_EXTENSION: &str = "md";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A content file split into front matter text and body, not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Path relative to the collection root
    pub rel_path: PathBuf,
    pub front_matter: Option<String>,
    pub body: String,
}

/// Discover every content file under `root`, recursing into sub-directories.
///
/// A missing root yields an empty list. Paths are returned sorted so that
/// discovery order, and everything derived from it, is stable across builds.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        tracing::debug!("Content directory {:?} not found; skipping", root);
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", root, err);
                continue;
            }
        };

        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(CONTENT_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }

    files
}

/// Read one content file and split off its front matter block
pub fn load(root: &Path, path: &Path) -> Result<RawDocument, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let split = split_frontmatter(&content);
    let rel_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    Ok(RawDocument {
        rel_path,
        front_matter: split.front_matter.map(str::to_string),
        body: split.body.to_string(),
    })
}
