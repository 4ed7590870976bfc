//! Document normalization: raw front matter and body into a canonical `Document`.

use crate::collab::{ImageKind, ImageSynth, MarkdownRenderer};
use crate::frontmatter::{parse_meta, FrontmatterError};
use crate::loader::RawDocument;
use crate::models::{
    DocDate, DocMeta, Document, Diagnostic, EpisodeMeta, EventMeta, Kind, PostMeta,
    WORDS_PER_MINUTE,
};
use crate::slug::slug_from_path;
use thiserror::Error;

/// Characters of body text kept in an excerpt
pub const EXCERPT_CHARS: usize = 150;

const MARKDOWN_CONTROL: &[char] = &['#', '*', '`'];

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    /// Writing a synthesized image failed; the output tree is unusable
    #[error("Failed to synthesize cover for {slug}: {source}")]
    Image {
        slug: String,
        #[source]
        source: std::io::Error,
    },
}

/// A normalized document with the problems recovered along the way
#[derive(Debug)]
pub struct Normalized {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Normalizer<'a> {
    renderer: &'a dyn MarkdownRenderer,
    images: &'a dyn ImageSynth,
}

impl<'a> Normalizer<'a> {
    pub fn new(renderer: &'a dyn MarkdownRenderer, images: &'a dyn ImageSynth) -> Self {
        Self { renderer, images }
    }

    pub fn normalize(&self, kind: Kind, raw: RawDocument) -> Result<Normalized, NormalizeError> {
        let front_matter = raw.front_matter.as_deref();
        let meta = match kind {
            Kind::Post => DocMeta::Post(parse_meta::<PostMeta>(front_matter)?),
            Kind::Event => DocMeta::Event(parse_meta::<EventMeta>(front_matter)?),
            Kind::Episode => DocMeta::Episode(parse_meta::<EpisodeMeta>(front_matter)?),
        };

        let slug = slug_from_path(&raw.rel_path);
        let source = raw.rel_path.to_string_lossy().replace('\\', "/");
        let mut diagnostics = Vec::new();

        let title = meta.common().title.trim();
        if title.is_empty() {
            diagnostics.push(Diagnostic::warning(
                "frontmatter.title-missing",
                format!("{}/{} has no title", kind.dir(), slug),
                Some(source.clone()),
            ));
        }

        let date = DocDate::parse(meta.raw_date());
        if !date.is_valid() && !date.raw().is_empty() {
            diagnostics.push(Diagnostic::warning(
                "date.invalid",
                format!(
                    "Unparsable {} '{}' in {}/{}",
                    kind.date_field(),
                    date.raw(),
                    kind.dir(),
                    slug
                ),
                Some(source.clone()),
            ));
        }

        let description = describe(&meta, &raw.body);

        // Unpublished posts never reach the output, so nothing is synthesized for them
        let cover_image = match &meta {
            DocMeta::Post(post) if !meta.is_published() => post.cover_image.clone(),
            DocMeta::Post(post) => Some(match &post.cover_image {
                Some(explicit) => explicit.clone(),
                None => self
                    .images
                    .synthesize(&post.common.title, &slug, ImageKind::Cover)
                    .map_err(|source| NormalizeError::Image {
                        slug: slug.clone(),
                        source,
                    })?,
            }),
            _ => None,
        };

        let rendered_html = self.renderer.render(&raw.body);

        Ok(Normalized {
            document: Document {
                kind,
                source_path: raw.rel_path,
                slug,
                reading_minutes: reading_minutes(&raw.body),
                meta,
                body: raw.body,
                rendered_html,
                date,
                description,
                cover_image,
            },
            diagnostics,
        })
    }
}

/// Explicit description, or the per-kind fallback
fn describe(meta: &DocMeta, body: &str) -> String {
    if let Some(explicit) = &meta.common().description {
        return explicit.clone();
    }

    match meta {
        DocMeta::Post(_) => excerpt(body),
        DocMeta::Event(event) => match &event.location {
            Some(location) => format!("Event: {} at {}", event.common.title, location),
            None => format!("Event: {}", event.common.title),
        },
        DocMeta::Episode(episode) => format!("Podcast Episode: {}", episode.common.title),
    }
}

/// First characters of the body with markdown control characters removed.
///
/// ```
/// use solopress_core::normalize::excerpt;
///
/// assert_eq!(excerpt("# Hello *world*"), "Hello world...");
/// ```
pub fn excerpt(body: &str) -> String {
    let head: String = body
        .chars()
        .take(EXCERPT_CHARS)
        .filter(|c| !MARKDOWN_CONTROL.contains(c))
        .collect();
    format!("{}...", head.trim())
}

/// Estimated minutes to read, never less than one
pub fn reading_minutes(body: &str) -> usize {
    let words = body
        .split_whitespace()
        .filter(|w| w.chars().any(|c| !MARKDOWN_CONTROL.contains(&c)))
        .count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}
