//! Collection building: one run per content kind.
//!
//! Each discovered file is loaded, normalized, rendered to its detail page and
//! pushed into the accumulator and the shared search index. The finalized
//! collection then gets its index page.

use crate::collab::{Collaborators, Seo, SeoType, SiteContext, TemplateError};
use crate::collection::{Collection, CollectionAccumulator};
use crate::config::{Config, ConfigError};
use crate::loader;
use crate::models::{DocMeta, Document, Diagnostic, Kind};
use crate::normalize::{NormalizeError, Normalizer};
use crate::search::{SearchEntry, SearchIndex};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Refusing to clear output directory {0:?}: it contains the content directory")]
    UnsafeOutput(PathBuf),
}

/// Write a generated file under the output root, creating parent directories
pub fn write_output(output_dir: &Path, rel_path: &str, contents: &str) -> Result<PathBuf, BuildError> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BuildError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, contents).map_err(|source| BuildError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Everything a collection run reads
pub struct BuildContext<'a> {
    pub config: &'a Config,
    pub output_dir: &'a Path,
    pub collab: Collaborators<'a>,
    pub site: &'a SiteContext,
}

impl BuildContext<'_> {
    /// Wrap a body fragment in the layout and write it
    pub fn write_page(
        &self,
        rel_path: &str,
        body_html: &str,
        title: &str,
        seo: &Seo,
    ) -> Result<PathBuf, BuildError> {
        let page = self
            .collab
            .templates
            .layout(self.site, body_html, title, seo)?;
        write_output(self.output_dir, rel_path, &page)
    }
}

/// Build every document of `kind` under `<content>/<kind dir>`.
///
/// Malformed documents are skipped with an error diagnostic; write and
/// template failures abort.
pub fn build_collection(
    kind: Kind,
    ctx: &BuildContext<'_>,
    search: &mut SearchIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Collection, BuildError> {
    let root = ctx.config.content_dir().join(kind.dir());
    let files = loader::discover(&root);
    tracing::info!("Building {} ({} files)", kind.dir(), files.len());

    let normalizer = Normalizer::new(ctx.collab.renderer, ctx.collab.images);
    let mut accumulator = CollectionAccumulator::new(kind);

    for path in &files {
        let source = path
            .strip_prefix(&root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let raw = match loader::load(&root, path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Skipping {}/{}: {}", kind.dir(), source, err);
                diagnostics.push(Diagnostic::error("load.unreadable", err.to_string(), Some(source)));
                continue;
            }
        };

        let normalized = match normalizer.normalize(kind, raw) {
            Ok(normalized) => normalized,
            Err(NormalizeError::Frontmatter(err)) => {
                tracing::error!("Skipping {}/{}: {}", kind.dir(), source, err);
                diagnostics.push(Diagnostic::error(
                    "frontmatter.invalid",
                    format!("Invalid front matter: {}", err),
                    Some(source),
                ));
                continue;
            }
            Err(NormalizeError::Image { slug, source }) => {
                return Err(BuildError::Write {
                    path: PathBuf::from(format!("assets/covers/{}.svg", slug)),
                    source,
                });
            }
        };

        // Drafts contribute nothing, not even their warnings
        if !normalized.document.meta.is_published() {
            tracing::debug!("Skipping unpublished {}", normalized.document.url());
            continue;
        }

        for diagnostic in &normalized.diagnostics {
            tracing::warn!("{}: {}", source, diagnostic.message);
        }
        diagnostics.extend(normalized.diagnostics);
        let doc = normalized.document;

        if accumulator.contains_slug(&doc.slug) {
            tracing::warn!("Duplicate slug {} in {}; keeping the first", doc.slug, kind.dir());
            diagnostics.push(Diagnostic::warning(
                "slug.duplicate",
                format!("Duplicate slug '{}' in {}; file ignored", doc.slug, kind.dir()),
                Some(source),
            ));
            continue;
        }

        let body = ctx.collab.templates.document(&doc)?;
        ctx.write_page(&doc.output_rel_path(), &body, doc.title(), &detail_seo(&doc))?;
        tracing::debug!("Wrote {}", doc.url());

        search.push(SearchEntry::for_document(&doc));
        if let Err(rejected) = accumulator.push(doc) {
            // contains_slug was checked above
            tracing::warn!("Document {} rejected by accumulator", rejected.slug);
        }
    }

    let collection = accumulator.finalize();

    let index_body = ctx.collab.templates.collection_index(&collection)?;
    let feature = ctx.config.feature(kind);
    ctx.write_page(
        &format!("{}/index.html", kind.dir()),
        &index_body,
        &feature.label,
        &Seo {
            seo_type: SeoType::Website,
            path: kind.index_url(),
            description: Some(index_description(kind, ctx.config)),
            ..Default::default()
        },
    )?;

    tracing::info!("Built {} {} documents", collection.len(), kind.dir());
    Ok(collection)
}

fn detail_seo(doc: &Document) -> Seo {
    let date = Some(doc.date.raw().to_string()).filter(|d| !d.is_empty());
    let description = Some(doc.description.clone());
    let path = doc.url();

    match &doc.meta {
        DocMeta::Post(_) => Seo {
            seo_type: SeoType::Article,
            path,
            image: doc.cover_image.clone(),
            description,
            date,
            location: None,
        },
        DocMeta::Event(event) => Seo {
            seo_type: SeoType::Event,
            path,
            image: None,
            description,
            date,
            location: event.location.clone(),
        },
        DocMeta::Episode(_) => Seo {
            seo_type: SeoType::Website,
            path,
            image: None,
            description,
            date,
            location: None,
        },
    }
}

fn index_description(kind: Kind, config: &Config) -> String {
    let noun = match kind {
        Kind::Post => "Blog posts",
        Kind::Event => "Upcoming events",
        Kind::Episode => "Podcast episodes",
    };
    if config.site_title.is_empty() {
        noun.to_string()
    } else {
        format!("{} from {}", noun, config.site_title)
    }
}
