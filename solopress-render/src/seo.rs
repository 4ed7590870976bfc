//! Head metadata: canonical URL, Open Graph values and JSON-LD.

use chrono::SecondsFormat;
use serde_json::{json, Value};
use solopress_core::{Config, DocDate, Seo, SeoType};

/// Resolved values the layout writes into `<head>`
#[derive(Debug, Clone)]
pub struct HeadMeta {
    pub full_title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: &'static str,
    pub image: Option<String>,
    /// Serialized JSON-LD, safe to embed in a `<script>` element
    pub json_ld: String,
}

impl HeadMeta {
    pub fn new(config: &Config, title: &str, seo: &Seo) -> Self {
        let full_title = if title.is_empty() {
            config.site_title.clone()
        } else {
            format!("{} | {}", title, config.site_title)
        };
        let description = seo
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| config.site_description.clone());
        let canonical = config.absolute_url(&seo.path);
        let image = seo.image.as_deref().map(|img| config.absolute_url(img));
        let published = seo.date.as_deref().and_then(iso_date).unwrap_or_default();

        let json_ld = match seo.seo_type {
            SeoType::Website => json!({
                "@context": "https://schema.org",
                "@type": "WebPage",
                "url": canonical,
                "name": full_title,
                "description": description,
                "author": { "@type": "Person", "name": config.author_name },
            }),
            SeoType::Article => json!({
                "@context": "https://schema.org",
                "@type": "BlogPosting",
                "mainEntityOfPage": { "@type": "WebPage", "@id": canonical },
                "headline": title,
                "description": description,
                "image": image.clone().unwrap_or_default(),
                "author": { "@type": "Person", "name": config.author_name },
                "datePublished": published,
                "dateModified": published,
            }),
            SeoType::Event => {
                let location = seo.location.clone().unwrap_or_default();
                json!({
                    "@context": "https://schema.org",
                    "@type": "Event",
                    "name": title,
                    "description": description,
                    "startDate": published,
                    "eventStatus": "https://schema.org/EventScheduled",
                    "eventAttendanceMode": "https://schema.org/OfflineEventAttendanceMode",
                    "location": { "@type": "Place", "name": location, "address": location },
                    "image": image.iter().cloned().collect::<Vec<_>>(),
                    "organizer": {
                        "@type": "Person",
                        "name": config.author_name,
                        "url": config.domain(),
                    },
                })
            }
        };

        Self {
            full_title,
            description,
            canonical,
            og_type: seo.seo_type.as_str(),
            image,
            json_ld: script_safe(&json_ld),
        }
    }
}

/// ISO 8601 form of a front matter date, `None` when it does not parse
fn iso_date(raw: &str) -> Option<String> {
    DocDate::parse(Some(raw))
        .timestamp()
        .map(|at| at.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Serialize so that no `</script>` can close the element early
fn script_safe(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}
