//! Frontmatter splitting and parsing for markdown files.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\x{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|$)(.*)$").unwrap()
    })
}

/// A markdown file split into its front matter block and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    /// YAML text between the delimiters; `None` when the file has no block
    pub front_matter: Option<&'a str>,
    pub body: &'a str,
}

/// Split the leading `---` delimited block from the body.
///
/// A file without a block yields `front_matter: None` and the full text as body.
pub fn split_frontmatter(content: &str) -> SplitDocument<'_> {
    match frontmatter_regex().captures(content) {
        Some(captures) => SplitDocument {
            front_matter: Some(captures.get(1).map_or("", |m| m.as_str())),
            body: captures.get(2).map_or("", |m| m.as_str()),
        },
        None => SplitDocument {
            front_matter: None,
            body: content,
        },
    }
}

/// Deserialize a front matter block into a typed record.
///
/// A missing, empty or comment-only block yields the record's default.
pub fn parse_meta<T>(front_matter: Option<&str>) -> Result<T, FrontmatterError>
where
    T: DeserializeOwned + Default,
{
    let Some(yaml) = front_matter.filter(|y| !y.trim().is_empty()) else {
        return Ok(T::default());
    };

    let value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body).
///
/// # Example
///
/// ```
/// use solopress_core::frontmatter::parse_frontmatter;
/// use solopress_core::models::PostMeta;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\n# Hello World\n";
///
/// let (fm, body) = parse_frontmatter::<PostMeta>(content).unwrap();
/// assert_eq!(fm.common.title, "My Post");
/// assert_eq!(fm.date, Some("2025-01-01".to_string()));
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter<T>(content: &str) -> Result<(T, String), FrontmatterError>
where
    T: DeserializeOwned + Default,
{
    let split = split_frontmatter(content);
    let meta = parse_meta(split.front_matter)?;
    Ok((meta, split.body.to_string()))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Any scalar as a string; null and collections become empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Any non-blank scalar as a string.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Tags as a YAML list, or a single comma-separated string.
pub(crate) fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = match Value::deserialize(deserializer)? {
        Value::Sequence(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    };

    Ok(raw
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EpisodeMeta, EventMeta, HomeMeta, PostMeta};

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Test Post
description: A test post
date: 2025-01-01
---

# Hello World

This is the content."#;

        let (fm, body) = parse_frontmatter::<PostMeta>(content).unwrap();
        assert_eq!(fm.common.title, "Test Post");
        assert_eq!(fm.common.description, Some("A test post".to_string()));
        assert_eq!(fm.date, Some("2025-01-01".to_string()));
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_frontmatter_with_tags() {
        let content = r#"---
title: Tagged Post
tags:
  - rust
  - programming
---

Content."#;

        let (fm, _) = parse_frontmatter::<PostMeta>(content).unwrap();
        assert_eq!(fm.tags, vec!["rust", "programming"]);
    }

    #[test]
    fn test_tags_as_string_and_null() {
        let (fm, _) = parse_frontmatter::<PostMeta>("---\ntitle: A\ntags: rust, web\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["rust", "web"]);

        let (fm, _) = parse_frontmatter::<PostMeta>("---\ntitle: A\ntags:\n---\n").unwrap();
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (fm, body) = parse_frontmatter::<PostMeta>(content).unwrap();
        assert_eq!(fm.common.title, "");
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let split = split_frontmatter("---\n---\nBody text");
        assert_eq!(split.front_matter, Some(""));
        assert_eq!(split.body, "Body text");

        let (fm, _) = parse_frontmatter::<HomeMeta>("---\n---\nBody").unwrap();
        assert!(fm.hero_image.is_none());
    }

    #[test]
    fn test_frontmatter_at_end_of_file() {
        let split = split_frontmatter("---\ntitle: Only Meta\n---");
        assert_eq!(split.front_matter, Some("title: Only Meta"));
        assert_eq!(split.body, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let split = split_frontmatter("---\r\ntitle: Windows\r\n---\r\nBody");
        assert_eq!(split.front_matter, Some("title: Windows"));
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_blank_scaffold_fields() {
        // Shape written by `solopress new`
        let content = r#"---
title: Fresh Episode
date: 2025-03-01
audio_url:
duration: "00:00"
length_bytes: 0
published: false
---

Show notes..."#;

        let (fm, _) = parse_frontmatter::<EpisodeMeta>(content).unwrap();
        assert_eq!(fm.audio_url, None);
        assert_eq!(fm.duration.as_deref(), Some("00:00"));
        assert_eq!(fm.length_bytes, Some(0));
        assert_eq!(fm.common.published, Some(false));
    }

    #[test]
    fn test_numeric_scalars_become_strings() {
        let (fm, _) =
            parse_frontmatter::<EventMeta>("---\ntitle: 1999\nlocation: 42\n---\n").unwrap();
        assert_eq!(fm.common.title, "1999");
        assert_eq!(fm.location.as_deref(), Some("42"));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(parse_frontmatter::<PostMeta>(content).is_err());
    }

    #[test]
    fn test_missing_title_is_empty() {
        let content = r#"---
description: No title
---

Content."#;

        let (fm, _) = parse_frontmatter::<PostMeta>(content).unwrap();
        assert_eq!(fm.common.title, "");
    }
}
