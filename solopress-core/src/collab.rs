//! Seams between the build pipeline and its collaborators.
//!
//! The pipeline never formats HTML or draws images itself. It hands finished
//! data to these traits: markdown rendering, page templating, and placeholder
//! image synthesis. `solopress-render` provides the production implementations.

use crate::collection::Collection;
use crate::models::{Document, Kind};
use crate::tags::{TagBucket, TagIndex};
use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to render {template} template: {source}")]
    Render {
        template: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Pure markdown to HTML conversion
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Placeholder image flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Cover,
    Hero,
    Favicon,
}

/// Deterministic placeholder image synthesis.
///
/// Returns the site-relative URL of the written image. Identical inputs must
/// produce the same file name and the same bytes.
pub trait ImageSynth {
    fn synthesize(&self, title: &str, slug: &str, kind: ImageKind) -> std::io::Result<String>;
}

/// Shape of the structured-data block injected by the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeoType {
    #[default]
    Website,
    Article,
    Event,
}

impl SeoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeoType::Website => "website",
            SeoType::Article => "article",
            SeoType::Event => "event",
        }
    }
}

/// Per-page SEO metadata handed to the layout
#[derive(Debug, Clone, Default)]
pub struct Seo {
    pub seo_type: SeoType,
    /// Site path of the page, e.g. `/blog/2025/hello.html`
    pub path: String,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Raw date string as written in front matter
    pub date: Option<String>,
    pub location: Option<String>,
}

/// Site-wide facts the layout needs for navigation and the footer
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Collections that are built in this run, in build order
    pub present: Vec<Kind>,
    pub favicon: Option<String>,
    pub build_time: DateTime<Utc>,
}

impl SiteContext {
    pub fn is_present(&self, kind: Kind) -> bool {
        self.present.contains(&kind)
    }

    /// Tag pages are written whenever the blog is built
    pub fn has_tags(&self) -> bool {
        self.is_present(Kind::Post)
    }

    pub fn year(&self) -> i32 {
        self.build_time.year()
    }
}

/// Content of the home page body
#[derive(Debug, Clone)]
pub struct HomePage {
    pub hero_image: Option<String>,
    pub body_html: String,
}

/// Page templating: the page shell plus every body fragment the site emits
pub trait Templates {
    /// Wrap a body fragment into a complete HTML document
    fn layout(
        &self,
        site: &SiteContext,
        body_html: &str,
        title: &str,
        seo: &Seo,
    ) -> Result<String, TemplateError>;

    fn home(&self, home: &HomePage) -> Result<String, TemplateError>;

    /// Detail page body for a single document of any kind
    fn document(&self, doc: &Document) -> Result<String, TemplateError>;

    /// Listing of a finalized collection in its sorted order
    fn collection_index(&self, collection: &Collection) -> Result<String, TemplateError>;

    fn tag_page(&self, bucket: &TagBucket<'_>) -> Result<String, TemplateError>;

    fn tag_directory(&self, index: &TagIndex<'_>) -> Result<String, TemplateError>;
}

/// Bundle of collaborators threaded through a build
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub renderer: &'a dyn MarkdownRenderer,
    pub templates: &'a dyn Templates,
    pub images: &'a dyn ImageSynth,
}
