//! Configuration parsing and management.

use crate::models::Kind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Main configuration struct matching the solopress.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site_title: String,

    #[serde(default)]
    pub site_description: String,

    #[serde(default)]
    pub author_name: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default)]
    pub twitter_handle: Option<String>,

    #[serde(default)]
    pub support_link: Option<String>,

    #[serde(default)]
    pub email_subscribe_form_url: Option<String>,

    #[serde(default)]
    pub custom_head_html: Option<String>,

    #[serde(default)]
    pub social_links: BTreeMap<String, String>,

    /// Required; checked by [`Config::validate`]
    #[serde(default)]
    pub nav_links: Option<Vec<NavLink>>,

    #[serde(default)]
    pub features: FeaturesConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub theme: Theme,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_domain() -> String {
    String::from("https://example.com")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

/// How a content kind is exposed on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    /// Built from the content directory
    #[default]
    Internal,
    /// Navigation points at an external site, nothing is built
    External,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default)]
    pub mode: FeatureMode,

    pub label: String,

    #[serde(default)]
    pub external_url: Option<String>,
}

impl FeatureConfig {
    fn internal(label: &str) -> Self {
        Self {
            mode: FeatureMode::Internal,
            label: label.to_string(),
            external_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_blog_feature")]
    pub blog: FeatureConfig,

    #[serde(default = "default_events_feature")]
    pub events: FeatureConfig,

    #[serde(default = "default_podcast_feature")]
    pub podcast: FeatureConfig,
}

fn default_blog_feature() -> FeatureConfig {
    FeatureConfig::internal("Blog")
}

fn default_events_feature() -> FeatureConfig {
    FeatureConfig::internal("Events")
}

fn default_podcast_feature() -> FeatureConfig {
    FeatureConfig::internal("Podcast")
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            blog: default_blog_feature(),
            events: default_events_feature(),
            podcast: default_podcast_feature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content_dir")]
    pub content: PathBuf,

    #[serde(default = "default_public_dir")]
    pub public: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content_dir(),
            public: default_public_dir(),
            output: default_output_dir(),
        }
    }
}

/// Visual theme: colors, fonts and spacing fed into the generated CSS and images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub colors: ThemeColors,

    #[serde(default)]
    pub fonts: ThemeFonts,

    #[serde(default)]
    pub scale: ThemeScale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub primary: String,
    pub on_primary: String,
    pub primary_container: String,
    pub on_primary_container: String,
    pub secondary: String,
    pub secondary_container: String,
    pub on_secondary_container: String,
    pub tertiary: Option<String>,
    pub surface: String,
    pub on_surface: String,
    pub outline: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#6750A4".into(),
            on_primary: "#FFFFFF".into(),
            primary_container: "#EADDFF".into(),
            on_primary_container: "#21005D".into(),
            secondary: "#625B71".into(),
            secondary_container: "#E8DEF8".into(),
            on_secondary_container: "#1D192B".into(),
            tertiary: None,
            surface: "#FFFBFE".into(),
            on_surface: "#1C1B1F".into(),
            outline: "#79747E".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeFonts {
    pub heading: String,
    pub body: String,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            heading: "'Roboto', sans-serif".into(),
            body: "'Roboto', sans-serif".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeScale {
    pub border_radius: String,
    pub spacing_unit: String,
}

impl Default for ThemeScale {
    fn default() -> Self {
        Self {
            border_radius: "12px".into(),
            spacing_unit: "8px".into(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text (paths stay relative to the working directory)
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Check structural fields the build cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::MissingField("site_title".to_string()));
        }
        if self.nav_links.is_none() {
            return Err(ConfigError::MissingField("nav_links".to_string()));
        }
        Ok(())
    }

    pub fn nav_links(&self) -> &[NavLink] {
        self.nav_links.as_deref().unwrap_or_default()
    }

    /// Feature settings for a content kind
    pub fn feature(&self, kind: Kind) -> &FeatureConfig {
        match kind {
            Kind::Post => &self.features.blog,
            Kind::Event => &self.features.events,
            Kind::Episode => &self.features.podcast,
        }
    }

    /// Get the content directory, resolved relative to config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    /// Get the static asset directory, resolved relative to config file
    pub fn public_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.public)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Override the directories (used by tests and the `--output` style overrides)
    pub fn with_paths(mut self, content: PathBuf, public: PathBuf, output: PathBuf) -> Self {
        self.paths = PathsConfig {
            content,
            public,
            output,
        };
        self
    }

    /// Domain without a trailing slash
    pub fn domain(&self) -> &str {
        self.domain.trim_end_matches('/')
    }

    /// Absolute URL for a site path (`/blog/index.html` -> `https://host/blog/index.html`)
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.domain(), path.trim_start_matches('/'))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_ref().and_then(|p| p.parent()) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
site_title: "Solo"
nav_links:
  - label: About
    url: /about.html
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(config.domain, "https://example.com");
        assert_eq!(config.features.blog.mode, FeatureMode::Internal);
        assert_eq!(config.features.podcast.label, "Podcast");
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(config.theme.colors.primary, "#6750A4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_nav_links_fails_validation() {
        let config = Config::from_yaml_str("site_title: Solo\n").unwrap();
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "nav_links"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_nav_links_is_valid() {
        let config = Config::from_yaml_str("site_title: Solo\nnav_links: []\n").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.nav_links().is_empty());
    }

    #[test]
    fn test_feature_modes() {
        let yaml = r#"
site_title: Solo
nav_links: []
features:
  blog:
    mode: external
    label: Writing
    external_url: https://substack.example
  events:
    mode: disabled
    label: Events
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.feature(Kind::Post).mode, FeatureMode::External);
        assert_eq!(config.feature(Kind::Event).mode, FeatureMode::Disabled);
        assert_eq!(config.feature(Kind::Episode).mode, FeatureMode::Internal);
    }

    #[test]
    fn test_absolute_url() {
        let mut config = Config::from_yaml_str(MINIMAL).unwrap();
        config.domain = "https://solo.example/".into();
        assert_eq!(
            config.absolute_url("/blog/index.html"),
            "https://solo.example/blog/index.html"
        );
        assert_eq!(config.absolute_url(""), "https://solo.example/");
        assert_eq!(
            config.absolute_url("https://cdn.example/a.png"),
            "https://cdn.example/a.png"
        );
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solopress.yml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output_dir(), dir.path().join("dist"));
        assert_eq!(config.content_dir(), dir.path().join("content"));
    }
}
