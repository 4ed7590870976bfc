//! Theme stylesheet generated from the `theme` config section.

use crate::RenderError;
use askama::Template;
use solopress_core::config::Theme;

#[derive(Template)]
#[template(path = "theme.css", escape = "none")]
struct ThemeCss<'a> {
    theme: &'a Theme,
    fonts_url: String,
    tertiary: &'a str,
}

/// Render the site stylesheet for a theme
pub fn theme_css(theme: &Theme) -> Result<String, RenderError> {
    let colors = &theme.colors;
    ThemeCss {
        theme,
        fonts_url: google_fonts_url(&theme.fonts.heading, &theme.fonts.body),
        tertiary: colors.tertiary.as_deref().unwrap_or(&colors.secondary),
    }
    .render()
    .map_err(|source| RenderError::Template {
        name: "theme.css",
        source,
    })
}

/// First family of a CSS font stack, unquoted (`'Inter', sans-serif` -> `Inter`)
pub fn primary_family(stack: &str) -> String {
    stack
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

fn google_fonts_url(heading: &str, body: &str) -> String {
    let heading = primary_family(heading).replace(' ', "+");
    let body = primary_family(body).replace(' ', "+");
    format!(
        "https://fonts.googleapis.com/css2?family={}:wght@400;700&family={}:wght@300;400;600&display=swap",
        heading, body
    )
}
