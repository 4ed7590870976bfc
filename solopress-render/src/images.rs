//! SVG placeholder images: post covers, the home hero and the favicon.

use askama::Template;
use solopress_core::config::Theme;
use solopress_core::{ImageKind, ImageSynth};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Template)]
#[template(path = "cover.svg", escape = "html")]
struct CoverSvg<'a> {
    title: &'a str,
    theme: &'a Theme,
    accent: &'a str,
}

#[derive(Template)]
#[template(path = "hero.svg", escape = "html")]
struct HeroSvg<'a> {
    title: &'a str,
    theme: &'a Theme,
}

#[derive(Template)]
#[template(path = "favicon.svg", escape = "html")]
struct FaviconSvg<'a> {
    initial: String,
    theme: &'a Theme,
}

/// Writes themed SVG placeholders under `<output>/assets`
pub struct SvgImages {
    output_dir: PathBuf,
    theme: Theme,
}

impl SvgImages {
    pub fn new(output_dir: impl Into<PathBuf>, theme: Theme) -> Self {
        Self {
            output_dir: output_dir.into(),
            theme,
        }
    }

    /// SVG source for an image, without touching the disk
    pub fn render(&self, title: &str, kind: ImageKind) -> Result<String, askama::Error> {
        let theme = &self.theme;
        match kind {
            ImageKind::Cover => CoverSvg {
                title,
                theme,
                accent: theme
                    .colors
                    .tertiary
                    .as_deref()
                    .unwrap_or(&theme.colors.on_primary),
            }
            .render(),
            ImageKind::Hero => HeroSvg { title, theme }.render(),
            ImageKind::Favicon => FaviconSvg {
                initial: initial(title),
                theme,
            }
            .render(),
        }
    }
}

impl ImageSynth for SvgImages {
    fn synthesize(&self, title: &str, slug: &str, kind: ImageKind) -> io::Result<String> {
        let rel = match kind {
            ImageKind::Cover => format!("assets/covers/{}.svg", slug),
            ImageKind::Hero => "assets/hero.svg".to_string(),
            ImageKind::Favicon => "assets/favicon.svg".to_string(),
        };

        let svg = self.render(title, kind).map_err(io::Error::other)?;
        let path = self.output_dir.join(&rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, svg)?;
        tracing::debug!("Synthesized {}", rel);

        Ok(format!("/{}", rel))
    }
}

/// Uppercased first alphanumeric character of the title
fn initial(title: &str) -> String {
    title
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "#".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cover_written_by_slug() {
        let dir = tempdir().unwrap();
        let images = SvgImages::new(dir.path(), Theme::default());

        let url = images
            .synthesize("Hello & <World>", "2025/hello", ImageKind::Cover)
            .unwrap();

        assert_eq!(url, "/assets/covers/2025/hello.svg");
        let svg = fs::read_to_string(dir.path().join("assets/covers/2025/hello.svg")).unwrap();
        assert!(svg.contains("width=\"1200\" height=\"630\""));
        assert!(svg.contains("Hello &amp; &lt;World&gt;"));
        assert!(svg.contains("#6750A4"));
    }

    #[test]
    fn test_hero_and_favicon_paths() {
        let dir = tempdir().unwrap();
        let images = SvgImages::new(dir.path(), Theme::default());

        assert_eq!(
            images.synthesize("Solo", "hero", ImageKind::Hero).unwrap(),
            "/assets/hero.svg"
        );
        assert_eq!(
            images.synthesize("solo", "favicon", ImageKind::Favicon).unwrap(),
            "/assets/favicon.svg"
        );

        let favicon = fs::read_to_string(dir.path().join("assets/favicon.svg")).unwrap();
        assert!(favicon.contains(">S</text>"));
        let hero = fs::read_to_string(dir.path().join("assets/hero.svg")).unwrap();
        assert!(hero.contains("width=\"1600\" height=\"500\""));
    }

    #[test]
    fn test_output_is_pure() {
        let images = SvgImages::new("unused", Theme::default());
        assert_eq!(
            images.render("Same", ImageKind::Cover).unwrap(),
            images.render("Same", ImageKind::Cover).unwrap()
        );
    }

    #[test]
    fn test_initial_fallback() {
        assert_eq!(initial("  élan"), "É");
        assert_eq!(initial("!!"), "#");
    }
}
