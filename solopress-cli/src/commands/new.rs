//! New command implementation: scaffold a content file with front matter.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use solopress_core::{slugify, Config, Kind};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Parse a `--date` argument
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM-DD, got {:?}", s))
}

/// Write a new unpublished document; never overwrites an existing file
pub fn new_content(config_path: &Path, title: &str, kind: Kind, date: NaiveDate) -> Result<()> {
    let title = title.trim();
    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Title {:?} does not produce a usable file name", title);
    }

    let content_dir = if config_path.exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load configuration from {:?}", config_path))?
            .content_dir()
    } else {
        tracing::debug!("No config at {:?}; using ./content", config_path);
        PathBuf::from("content")
    };

    let path = content_path(&content_dir, kind, &slug, date);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            bail!("File already exists: {:?}", path)
        }
        Err(err) => return Err(err).with_context(|| format!("Failed to create {:?}", path)),
    };
    file.write_all(front_matter(kind, title, date).as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("✓ Created {}: {:?}", kind.dir(), path);
    Ok(())
}

/// Posts are grouped by year; other kinds sit directly in their directory
fn content_path(content_dir: &Path, kind: Kind, slug: &str, date: NaiveDate) -> PathBuf {
    let dir = content_dir.join(kind.dir());
    let file = format!("{}.md", slug);
    match kind {
        Kind::Post => dir.join(date.year().to_string()).join(file),
        Kind::Event | Kind::Episode => dir.join(file),
    }
}

fn front_matter(kind: Kind, title: &str, date: NaiveDate) -> String {
    // A JSON string is a valid double-quoted YAML scalar
    let quoted = serde_json::Value::from(title).to_string();
    let date = date.format("%Y-%m-%d");
    match kind {
        Kind::Post => format!(
            "---\ntitle: {quoted}\ndate: {date}\ndescription:\ntags: []\ncover_image:\npublished: false\n---\n\n# {title}\n\nWrite your post here...\n"
        ),
        Kind::Event => format!(
            "---\ntitle: {quoted}\nevent_date: {date}\nlocation: Virtual\nrsvp_link:\npublished: false\n---\n\nWrite event details...\n"
        ),
        Kind::Episode => format!(
            "---\ntitle: {quoted}\ndate: {date}\naudio_url:\nduration: \"00:00\"\nlength_bytes: 0\npublished: false\n---\n\nShow notes...\n"
        ),
    }
}
