//! # solopress-render
//!
//! HTML templating, theme CSS and SVG placeholder images for solopress.
//!
//! [`AskamaTemplates`] implements the pipeline's `Templates` seam and
//! [`SvgImages`] implements `ImageSynth`. Both are pure functions of the
//! configuration and the data handed to them.

pub mod images;
pub mod seo;
pub mod templates;
pub mod theme;

use thiserror::Error;

pub use images::SvgImages;
pub use templates::AskamaTemplates;
pub use theme::theme_css;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render {name}: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: askama::Error,
    },
}
