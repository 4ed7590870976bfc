//! Slug generation and normalization.

use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace with hyphens
/// - Remove special characters (except hyphens)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use solopress_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    // Keep ascii alphanumerics, hyphens and unicode letters
    let cleaned = with_hyphens
        .graphemes(true)
        .filter(|g| {
            g.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic())
        })
        .collect::<String>();

    let re = HYPHEN_RUN.get_or_init(|| Regex::new(r"-+").unwrap());
    let collapsed = re.replace_all(&cleaned, "-");

    collapsed.trim_matches('-').to_string()
}

/// Derive a document slug from its path relative to the collection root.
///
/// The extension is stripped and components are joined with `/` whatever the
/// host separator is, so `2025/my-post.md` becomes `2025/my-post`.
///
/// ```
/// use solopress_core::slug::slug_from_path;
/// use std::path::Path;
///
/// assert_eq!(slug_from_path(Path::new("2025/my-post.md")), "2025/my-post");
/// ```
pub fn slug_from_path(rel_path: &Path) -> String {
    let stripped = rel_path.with_extension("");
    stripped
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Post"), "my-first-post");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("Node.js Tips"), "nodejs-tips");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café"), "café");
    }

    #[test]
    fn test_multiple_spaces_and_edges() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("  Hello World  "), "hello-world");
        assert_eq!(slugify("-Leading Hyphen"), "leading-hyphen");
        assert_eq!(slugify("hello_world"), "hello-world");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_from_flat_path() {
        assert_eq!(slug_from_path(Path::new("launch-party.md")), "launch-party");
    }

    #[test]
    fn test_slug_from_nested_path() {
        let path: PathBuf = ["2025", "my-post.md"].iter().collect();
        assert_eq!(slug_from_path(&path), "2025/my-post");
    }

    #[test]
    fn test_slug_keeps_inner_dots() {
        assert_eq!(slug_from_path(Path::new("v1.2-release.md")), "v1.2-release");
    }
}
