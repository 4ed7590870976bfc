//! # solopress-core
//!
//! Build pipeline for the solopress static site generator.
//!
//! Content is discovered and loaded (`loader`), normalized into documents
//! (`normalize`), built into per-kind collections (`builder`), indexed
//! (`tags`, `search`, `feed`, `sitemap`) and written as a complete site by
//! the `SiteAssembler`. HTML templating and image synthesis are reached only
//! through the traits in `collab`.

pub mod builder;
pub mod collab;
pub mod collection;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod models;
pub mod normalize;
pub mod search;
pub mod site;
pub mod sitemap;
pub mod slug;
pub mod tags;

pub use builder::BuildError;
pub use collab::{
    Collaborators, HomePage, ImageKind, ImageSynth, MarkdownRenderer, Seo, SeoType, SiteContext,
    TemplateError, Templates,
};
pub use collection::Collection;
pub use config::{Config, ConfigError, FeatureMode};
pub use markdown::MarkdownProcessor;
pub use models::{Diagnostic, DiagnosticSeverity, DocDate, DocMeta, Document, Kind};
pub use search::{SearchEntry, SearchIndex};
pub use site::{BuildReport, SiteAssembler};
pub use slug::slugify;
pub use tags::{TagBucket, TagIndex};
