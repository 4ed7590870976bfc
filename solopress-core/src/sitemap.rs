//! Sitemap and robots.txt generation.
//!
//! The sitemap is seeded with the home page and every present collection
//! index, then completed by walking the finished output tree for `.html`
//! files. It must therefore run after every other writer.

use crate::config::Config;
use crate::models::Kind;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

pub const SITEMAP_FILE: &str = "sitemap.xml";
pub const ROBOTS_FILE: &str = "robots.txt";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const DISCOVERED_PRIORITY: &str = "0.6";

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub loc: String,
    pub priority: &'static str,
}

#[derive(Debug, Default)]
pub struct Sitemap {
    urls: Vec<UrlEntry>,
    seen: HashSet<String>,
}

impl Sitemap {
    /// Root, home page and the index page of each present collection
    pub fn seeded(config: &Config, present: &[Kind]) -> Self {
        let mut sitemap = Self::default();
        sitemap.add(config.absolute_url("/"), "1.0");
        sitemap.add(config.absolute_url("/index.html"), "0.8");
        for kind in present {
            sitemap.add(config.absolute_url(&kind.index_url()), "0.9");
        }
        sitemap
    }

    /// Add every `.html` file under `output_dir` not already listed
    pub fn discover(&mut self, config: &Config, output_dir: &Path) -> std::io::Result<()> {
        for entry in WalkDir::new(output_dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::other)?;
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }

            let rel = entry.path().strip_prefix(output_dir).unwrap_or(entry.path());
            self.add(config.absolute_url(&url_path(rel)), DISCOVERED_PRIORITY);
        }
        Ok(())
    }

    fn add(&mut self, loc: String, priority: &'static str) {
        if self.seen.insert(loc.clone()) {
            self.urls.push(UrlEntry { loc, priority });
        }
    }

    pub fn urls(&self) -> &[UrlEntry] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Generate sitemap XML; every entry carries the same `lastmod`
    pub fn into_xml(self, lastmod: DateTime<Utc>) -> String {
        let lastmod = lastmod.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Walk the finished output tree and write `sitemap.xml`; returns the URL count
pub fn write_sitemap(
    config: &Config,
    output_dir: &Path,
    present: &[Kind],
    build_time: DateTime<Utc>,
) -> std::io::Result<usize> {
    let mut sitemap = Sitemap::seeded(config, present);
    sitemap.discover(config, output_dir)?;
    let count = sitemap.len();

    fs::write(output_dir.join(SITEMAP_FILE), sitemap.into_xml(build_time))?;
    tracing::info!("Wrote {} ({} urls)", SITEMAP_FILE, count);
    Ok(count)
}

/// robots.txt allowing everything and pointing at the sitemap
pub fn robots_txt(config: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}\n",
        config.absolute_url(SITEMAP_FILE)
    )
}

/// `/`-joined relative path regardless of the host separator
fn url_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
