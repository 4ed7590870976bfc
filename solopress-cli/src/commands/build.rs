//! Build command implementation.

use anyhow::{Context, Result};
use solopress_core::{
    Collaborators, Config, DiagnosticSeverity, MarkdownProcessor, SiteAssembler,
};
use solopress_render::{AskamaTemplates, SvgImages};
use std::path::Path;

/// Build the static site described by the config file
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;
    config.validate().context("Invalid configuration")?;

    let renderer = MarkdownProcessor::new();
    let templates = AskamaTemplates::new(&config).context("Failed to prepare templates")?;
    let images = SvgImages::new(config.output_dir(), config.theme.clone());
    let collab = Collaborators {
        renderer: &renderer,
        templates: &templates,
        images: &images,
    };

    let report = SiteAssembler::new(&config, collab)
        .build()
        .context("Failed to build site")?;

    for diagnostic in &report.diagnostics {
        let level = match diagnostic.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        };
        eprintln!(
            "{}[{}] {}: {}",
            level,
            diagnostic.code,
            diagnostic.source_path.as_deref().unwrap_or("-"),
            diagnostic.message
        );
    }

    println!("✓ Built {} documents", report.total_documents());
    for (kind, count) in &report.documents {
        println!("  - {}: {}", kind.dir(), count);
    }
    println!("✓ {} tag pages, {} search entries, {} sitemap URLs", report.tags, report.search_entries, report.sitemap_urls);
    println!("✓ Output written to {:?}", report.output_dir);
    Ok(())
}
