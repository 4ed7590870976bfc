//! Content model: kinds, per-kind front matter, documents and diagnostics.

use crate::frontmatter::{lenient_bool, lenient_opt_string, lenient_string, lenient_tags, lenient_u64};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Words per minute used for the reading time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Content kind; one collection per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Post,
    Event,
    Episode,
}

/// Direction a collection is sorted by its date key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Kind {
    /// Build order used by the assembler
    pub const ALL: [Kind; 3] = [Kind::Post, Kind::Event, Kind::Episode];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blog" | "post" | "posts" => Some(Kind::Post),
            "events" | "event" => Some(Kind::Event),
            "podcast" | "episode" | "episodes" => Some(Kind::Episode),
            _ => None,
        }
    }

    /// Directory name, used both under the content root and the output root
    pub fn dir(&self) -> &'static str {
        match self {
            Kind::Post => "blog",
            Kind::Event => "events",
            Kind::Episode => "podcast",
        }
    }

    /// Label written into the search payload `type` field
    pub fn search_label(&self) -> &'static str {
        match self {
            Kind::Post => "Blog",
            Kind::Event => "Event",
            Kind::Episode => "Podcast",
        }
    }

    /// Front matter field holding the sort date
    pub fn date_field(&self) -> &'static str {
        match self {
            Kind::Event => "event_date",
            Kind::Post | Kind::Episode => "date",
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        match self {
            Kind::Event => SortOrder::Ascending,
            Kind::Post | Kind::Episode => SortOrder::Descending,
        }
    }

    /// URL of the collection index page
    pub fn index_url(&self) -> String {
        format!("/{}/index.html", self.dir())
    }
}

/// A parsed date, or the sentinel for an absent/unparsable one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocDate {
    Valid { at: NaiveDateTime, raw: String },
    /// Raw text as written (empty when the field was absent)
    Invalid(String),
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

impl DocDate {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return DocDate::Invalid(String::new());
        };

        let parsed = chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| {
                DATE_TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            })
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });

        match parsed {
            Some(at) => DocDate::Valid {
                at,
                raw: raw.to_string(),
            },
            None => DocDate::Invalid(raw.to_string()),
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            DocDate::Valid { at, .. } => Some(*at),
            DocDate::Invalid(_) => None,
        }
    }

    /// The date as written in front matter
    pub fn raw(&self) -> &str {
        match self {
            DocDate::Valid { raw, .. } => raw,
            DocDate::Invalid(raw) => raw,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, DocDate::Valid { .. })
    }

    /// Compare for a collection ordering; invalid dates go last in either direction
    pub fn cmp_for(&self, other: &DocDate, order: SortOrder) -> Ordering {
        match (self.timestamp(), other.timestamp()) {
            (Some(a), Some(b)) => match order {
                SortOrder::Ascending => a.cmp(&b),
                SortOrder::Descending => b.cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Fields shared by every content kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonMeta {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,

    /// Absent means published
    #[serde(default, deserialize_with = "lenient_bool")]
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(flatten)]
    pub common: CommonMeta,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMeta {
    #[serde(flatten)]
    pub common: CommonMeta,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub event_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub rsvp_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeMeta {
    #[serde(flatten)]
    pub common: CommonMeta,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub audio_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub length_bytes: Option<u64>,
}

/// Front matter of the home document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeMeta {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub hero_image: Option<String>,
}

/// Per-kind front matter record
#[derive(Debug, Clone)]
pub enum DocMeta {
    Post(PostMeta),
    Event(EventMeta),
    Episode(EpisodeMeta),
}

impl DocMeta {
    pub fn kind(&self) -> Kind {
        match self {
            DocMeta::Post(_) => Kind::Post,
            DocMeta::Event(_) => Kind::Event,
            DocMeta::Episode(_) => Kind::Episode,
        }
    }

    pub fn common(&self) -> &CommonMeta {
        match self {
            DocMeta::Post(m) => &m.common,
            DocMeta::Event(m) => &m.common,
            DocMeta::Episode(m) => &m.common,
        }
    }

    /// The raw value of the kind's date field
    pub fn raw_date(&self) -> Option<&str> {
        match self {
            DocMeta::Post(m) => m.date.as_deref(),
            DocMeta::Event(m) => m.event_date.as_deref(),
            DocMeta::Episode(m) => m.date.as_deref(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.common().published.unwrap_or(true)
    }
}

/// A fully normalized content document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: Kind,

    /// Path relative to the collection root
    pub source_path: PathBuf,

    /// Relative path without extension, `/`-separated (e.g. "2025/my-post")
    pub slug: String,

    pub meta: DocMeta,

    /// Markdown body with front matter stripped
    pub body: String,

    /// Body rendered to HTML (computed once during normalization)
    pub rendered_html: String,

    pub date: DocDate,

    /// Explicit description or the derived fallback
    pub description: String,

    pub reading_minutes: usize,

    /// Cover image URL (posts only)
    pub cover_image: Option<String>,
}

impl Document {
    pub fn title(&self) -> &str {
        &self.meta.common().title
    }

    /// Get the URL path for this document
    pub fn url(&self) -> String {
        format!("/{}", self.output_rel_path())
    }

    /// Relative output path for this document (no leading slash)
    pub fn output_rel_path(&self) -> String {
        format!("{}/{}.html", self.kind.dir(), self.slug)
    }

    pub fn tags(&self) -> &[String] {
        match &self.meta {
            DocMeta::Post(m) => &m.tags,
            _ => &[],
        }
    }

    pub fn reading_time(&self) -> String {
        format!("{} min read", self.reading_minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

/// A recovered problem surfaced to the user after the build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub source_path: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: &str, message: impl Into<String>, source_path: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
            source_path,
        }
    }

    pub fn error(code: &str, message: impl Into<String>, source_path: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: DiagnosticSeverity::Error,
            source_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        assert_eq!(Kind::from_str("blog"), Some(Kind::Post));
        assert_eq!(Kind::from_str("EVENTS"), Some(Kind::Event));
        assert_eq!(Kind::from_str("podcast"), Some(Kind::Episode));
        assert_eq!(Kind::from_str("invalid"), None);
        assert_eq!(Kind::Episode.dir(), "podcast");
        assert_eq!(Kind::Event.date_field(), "event_date");
    }

    #[test]
    fn test_date_formats() {
        assert!(DocDate::parse(Some("2025-01-01")).is_valid());
        assert!(DocDate::parse(Some("2025-01-01T10:30:00Z")).is_valid());
        assert!(DocDate::parse(Some("2025-01-01T10:30:00")).is_valid());
        assert!(DocDate::parse(Some("2025-01-01 10:30")).is_valid());

        let invalid = DocDate::parse(Some("next tuesday"));
        assert!(!invalid.is_valid());
        assert_eq!(invalid.raw(), "next tuesday");

        assert_eq!(DocDate::parse(None), DocDate::Invalid(String::new()));
        assert_eq!(DocDate::parse(Some("  ")).raw(), "");
    }

    #[test]
    fn test_invalid_dates_sort_last() {
        let early = DocDate::parse(Some("2024-01-01"));
        let late = DocDate::parse(Some("2025-01-01"));
        let bad = DocDate::parse(Some("soon"));

        assert_eq!(late.cmp_for(&early, SortOrder::Descending), Ordering::Less);
        assert_eq!(early.cmp_for(&late, SortOrder::Ascending), Ordering::Less);
        assert_eq!(early.cmp_for(&bad, SortOrder::Ascending), Ordering::Less);
        assert_eq!(bad.cmp_for(&early, SortOrder::Descending), Ordering::Greater);
        assert_eq!(bad.cmp_for(&bad, SortOrder::Descending), Ordering::Equal);
    }

    #[test]
    fn test_published_defaults_to_true() {
        let meta = DocMeta::Post(PostMeta::default());
        assert!(meta.is_published());

        let mut hidden = PostMeta::default();
        hidden.common.published = Some(false);
        assert!(!DocMeta::Post(hidden).is_published());
    }
}
