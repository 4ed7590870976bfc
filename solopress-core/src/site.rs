//! Site assembly: runs every stage in dependency order over a clean output tree.

use crate::builder::{build_collection, write_output, BuildContext, BuildError};
use crate::collab::{Collaborators, HomePage, ImageKind, Seo, SeoType, SiteContext};
use crate::config::{Config, FeatureMode};
use crate::feed::Feed;
use crate::frontmatter::parse_meta;
use crate::loader;
use crate::models::{Diagnostic, HomeMeta, Kind};
use crate::search::SearchIndex;
use crate::sitemap::{robots_txt, write_sitemap, ROBOTS_FILE};
use crate::tags::{tag_directory_rel_path, tag_directory_url, TagIndex};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Home document at the content root
pub const HOME_FILE: &str = "home.md";

const DEFAULT_HOME_HTML: &str = "<h1>Welcome</h1>";

/// Summary of a finished build
#[derive(Debug, Default)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Documents built per present collection
    pub documents: BTreeMap<Kind, usize>,
    pub tags: usize,
    pub search_entries: usize,
    pub sitemap_urls: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn total_documents(&self) -> usize {
        self.documents.values().sum()
    }
}

/// Orchestrates a full build
pub struct SiteAssembler<'a> {
    config: &'a Config,
    collab: Collaborators<'a>,
    build_time: DateTime<Utc>,
}

impl<'a> SiteAssembler<'a> {
    pub fn new(config: &'a Config, collab: Collaborators<'a>) -> Self {
        Self {
            config,
            collab,
            build_time: Utc::now(),
        }
    }

    /// Pin the build timestamp used for feeds, sitemap and the footer year
    pub fn with_build_time(mut self, build_time: DateTime<Utc>) -> Self {
        self.build_time = build_time;
        self
    }

    /// Collections built this run: internal mode and an existing content directory
    pub fn present_kinds(&self) -> Vec<Kind> {
        let content_dir = self.config.content_dir();
        Kind::ALL
            .into_iter()
            .filter(|kind| {
                self.config.feature(*kind).mode == FeatureMode::Internal
                    && content_dir.join(kind.dir()).is_dir()
            })
            .collect()
    }

    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let config = self.config;
        config.validate()?;
        let output_dir = config.output_dir();
        tracing::info!("Building site: {}", config.site_title);

        prepare_output(&output_dir, &config.content_dir())?;

        let public_dir = config.public_dir();
        if public_dir.is_dir() {
            copy_dir(&public_dir, &output_dir)?;
            tracing::info!("Copied static assets from {:?}", public_dir);
        }

        let favicon = self
            .collab
            .images
            .synthesize(&config.site_title, "favicon", ImageKind::Favicon)
            .map_err(|source| BuildError::Write {
                path: output_dir.join("assets/favicon.svg"),
                source,
            })?;

        let site = SiteContext {
            present: self.present_kinds(),
            favicon: Some(favicon),
            build_time: self.build_time,
        };
        let ctx = BuildContext {
            config,
            output_dir: &output_dir,
            collab: self.collab,
            site: &site,
        };

        let mut report = BuildReport {
            output_dir: output_dir.clone(),
            ..Default::default()
        };
        let mut search = SearchIndex::new();

        self.build_home(&ctx, &mut report.diagnostics)?;

        for kind in &site.present {
            let collection = build_collection(*kind, &ctx, &mut search, &mut report.diagnostics)?;

            if *kind == Kind::Post {
                let index = TagIndex::from_collection(&collection, &mut report.diagnostics);
                write_tags(&ctx, &index)?;
                report.tags = index.len();
            }

            Feed::new(config, &collection, self.build_time)
                .write(&output_dir)
                .map_err(BuildError::Io)?;

            report.documents.insert(*kind, collection.len());
        }

        search.write(&output_dir)?;
        report.search_entries = search.len();
        write_output(&output_dir, ROBOTS_FILE, &robots_txt(config))?;

        // Walks the finished tree, so it must stay last
        report.sitemap_urls = write_sitemap(config, &output_dir, &site.present, self.build_time)?;

        tracing::info!(
            "Built {} documents, {} tags into {:?}",
            report.total_documents(),
            report.tags,
            output_dir
        );
        Ok(report)
    }

    fn build_home(&self, ctx: &BuildContext<'_>, diagnostics: &mut Vec<Diagnostic>) -> Result<(), BuildError> {
        let content_dir = self.config.content_dir();
        let home_path = content_dir.join(HOME_FILE);

        let home = if home_path.is_file() {
            self.load_home(&content_dir, &home_path, diagnostics)
        } else {
            tracing::debug!("No {} found; using default home page", HOME_FILE);
            None
        };

        let (body, seo) = match home {
            Some((meta, body_md)) => {
                let hero_image = match meta.hero_image {
                    Some(explicit) => explicit,
                    None => self
                        .collab
                        .images
                        .synthesize(&self.config.site_title, "hero", ImageKind::Hero)
                        .map_err(|source| BuildError::Write {
                            path: ctx.output_dir.join("assets/hero.svg"),
                            source,
                        })?,
                };
                let body = ctx.collab.templates.home(&HomePage {
                    hero_image: Some(hero_image.clone()),
                    body_html: ctx.collab.renderer.render(&body_md),
                })?;
                let seo = Seo {
                    seo_type: SeoType::Website,
                    path: "/".to_string(),
                    image: Some(hero_image),
                    description: meta.description,
                    ..Default::default()
                };
                (body, seo)
            }
            None => (
                DEFAULT_HOME_HTML.to_string(),
                Seo {
                    path: "/".to_string(),
                    ..Default::default()
                },
            ),
        };

        ctx.write_page("index.html", &body, "Home", &seo)?;
        Ok(())
    }

    fn load_home(
        &self,
        content_dir: &Path,
        home_path: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<(HomeMeta, String)> {
        let raw = match loader::load(content_dir, home_path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Ignoring {}: {}", HOME_FILE, err);
                diagnostics.push(Diagnostic::error("load.unreadable", err.to_string(), Some(HOME_FILE.into())));
                return None;
            }
        };

        match parse_meta::<HomeMeta>(raw.front_matter.as_deref()) {
            Ok(meta) => Some((meta, raw.body)),
            Err(err) => {
                tracing::error!("Ignoring {}: {}", HOME_FILE, err);
                diagnostics.push(Diagnostic::error(
                    "frontmatter.invalid",
                    format!("Invalid front matter: {}", err),
                    Some(HOME_FILE.into()),
                ));
                None
            }
        }
    }
}

fn write_tags(ctx: &BuildContext<'_>, index: &TagIndex<'_>) -> Result<(), BuildError> {
    for bucket in index.buckets() {
        let body = ctx.collab.templates.tag_page(bucket)?;
        ctx.write_page(
            &bucket.output_rel_path(),
            &body,
            &format!("Tag: {}", bucket.name),
            &Seo {
                path: bucket.url(),
                description: Some(format!("Posts tagged {}", bucket.name)),
                ..Default::default()
            },
        )?;
    }

    let body = ctx.collab.templates.tag_directory(index)?;
    ctx.write_page(
        &tag_directory_rel_path(),
        &body,
        "Tags",
        &Seo {
            path: tag_directory_url(),
            ..Default::default()
        },
    )?;

    tracing::info!("Wrote {} tag pages", index.len());
    Ok(())
}

/// Empty the output root, creating it when missing
fn prepare_output(output_dir: &Path, content_dir: &Path) -> Result<(), BuildError> {
    let output_abs = absolute(output_dir);
    if absolute(content_dir).starts_with(&output_abs) {
        return Err(BuildError::UnsafeOutput(output_dir.to_path_buf()));
    }

    let write_err = |source: std::io::Error| BuildError::Write {
        path: output_dir.to_path_buf(),
        source,
    };

    if output_dir.is_dir() {
        for entry in fs::read_dir(output_dir).map_err(write_err)? {
            let path = entry.map_err(write_err)?.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|source| BuildError::Write { path, source })?;
        }
    } else {
        fs::create_dir_all(output_dir).map_err(write_err)?;
    }

    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<(), BuildError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target).map_err(|source| BuildError::Write {
            path: target.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_output_empties_existing_tree() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir_all(out.join("stale/nested")).unwrap();
        fs::write(out.join("old.html"), "x").unwrap();

        prepare_output(&out, &dir.path().join("content")).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_output_refuses_content_parent() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("home.md"), "hi").unwrap();

        let result = prepare_output(dir.path(), &content);
        assert!(matches!(result, Err(BuildError::UnsafeOutput(_))));
        assert!(content.join("home.md").exists());
    }

    #[test]
    fn test_copy_dir_keeps_structure() {
        let dir = tempdir().unwrap();
        let public = dir.path().join("public");
        fs::create_dir_all(public.join("img")).unwrap();
        fs::write(public.join("img/logo.png"), [1u8, 2, 3]).unwrap();
        let out = dir.path().join("dist");

        copy_dir(&public, &out).unwrap();
        assert_eq!(fs::read(out.join("img/logo.png")).unwrap(), vec![1, 2, 3]);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_dir_reports_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let public = dir.path().join("public");
        let locked = public.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = copy_dir(&public, &dir.path().join("dist"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(BuildError::Walk(_))));
    }
}
