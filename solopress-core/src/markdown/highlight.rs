//! Code syntax highlighting using syntect.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Option<Theme>> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME
        .get_or_init(|| {
            let theme_set = ThemeSet::load_defaults();
            theme_set
                .themes
                .get("InspiredGitHub")
                .or_else(|| theme_set.themes.get("base16-ocean.light"))
                .cloned()
        })
        .as_ref()
}

/// Replaces fenced code blocks that carry a language tag with highlighted HTML
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                    if !lang.trim().is_empty() =>
                {
                    code_lang = Some(lang.trim().to_string());
                    code_content.clear();
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_content.push_str(&text);
                }
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    let lang = code_lang.take().unwrap_or_default();
                    let highlighted = highlight_code(&code_content, &lang);
                    result.push(Event::Html(CowStr::Boxed(highlighted.into_boxed_str())));
                }
                other => result.push(other),
            }
        }

        result
    }
}

impl Default for HighlightTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn highlight_code(code: &str, lang: &str) -> String {
    // Info strings may carry extra attributes after the language ("rust,ignore")
    let token = lang
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or(lang);

    let ss = syntax_set();
    let syntax = ss
        .find_syntax_by_token(token)
        .or_else(|| ss.find_syntax_by_extension(token))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let Some(theme) = theme() else {
        return plain_block(code, token);
    };

    match highlighted_html_for_string(code, ss, syntax, theme) {
        Ok(html) => html,
        Err(err) => {
            tracing::debug!("Highlighting failed for language '{}': {}", token, err);
            plain_block(code, token)
        }
    }
}

fn plain_block(code: &str, lang: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        html_escape(lang),
        html_escape(code)
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
