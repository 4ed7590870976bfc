//! Markdown rendering with heading anchors and highlighted code blocks.

pub mod highlight;

use crate::collab::MarkdownRenderer;
use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

pub use highlight::HighlightTransformer;

/// Markdown processor backed by pulldown-cmark and syntect
pub struct MarkdownProcessor {
    options: Options,
    highlighter: HighlightTransformer,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            highlighter: HighlightTransformer::new(),
        }
    }

    /// Convert markdown to HTML
    pub fn convert(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let ids = heading_ids(&events);
        let events = attach_heading_ids(events, ids);
        let events = self.highlighter.transform(events);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for MarkdownProcessor {
    fn render(&self, markdown: &str) -> String {
        self.convert(markdown)
    }
}

/// Slugified heading text for every heading, deduplicated with a numeric suffix
fn heading_ids(events: &[Event]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = current.take() {
                    let base = slugify(&title);
                    let count = seen.entry(base.clone()).or_insert(0);
                    let id = if *count == 0 {
                        base
                    } else {
                        format!("{}-{}", base, count)
                    };
                    *count += 1;
                    ids.push(id);
                }
            }
            _ => {}
        }
    }

    ids
}

fn attach_heading_ids(events: Vec<Event<'_>>, ids: Vec<String>) -> Vec<Event<'_>> {
    let mut ids = ids.into_iter();

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let generated = ids.next();
                // An explicit `{#id}` attribute wins
                let id = id.or_else(|| {
                    generated
                        .filter(|g| !g.is_empty())
                        .map(|g| CowStr::Boxed(g.into_boxed_str()))
                });
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("# Hello World\n\nThis is a **test**.");
        assert!(html.contains("<h1 id=\"hello-world\">"));
        assert!(html.contains("<strong>test</strong>"));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("## Notes\n\n## Notes\n");
        assert!(html.contains("id=\"notes\""));
        assert!(html.contains("id=\"notes-1\""));
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let processor = MarkdownProcessor::new();
        let html = processor.convert("## Setup {#install}\n");
        assert!(html.contains("id=\"install\""));
    }

    #[test]
    fn test_tables() {
        let processor = MarkdownProcessor::new();
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = processor.convert(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Header 1</th>"));
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let processor = MarkdownProcessor::new();
        let html = processor.render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("style="));
        assert!(html.contains("main"));
    }
}
