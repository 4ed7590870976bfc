//! Askama template definitions and the `Templates` implementation.

use crate::seo::HeadMeta;
use crate::theme::theme_css;
use crate::RenderError;
use askama::Template;
use solopress_core::models::{EpisodeMeta, EventMeta, PostMeta};
use solopress_core::tags::{tag_directory_url, tag_url};
use solopress_core::{
    Collection, Config, DocMeta, Document, FeatureMode, HomePage, Kind, Seo, SiteContext,
    TagBucket, TagIndex, TemplateError, Templates,
};

/// One entry of the header navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub url: String,
    /// Opens in a new tab and carries an arrow marker
    pub external: bool,
}

#[derive(Debug, Clone)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// A tag link with its post count
#[derive(Debug, Clone)]
pub struct TagLink {
    pub name: String,
    pub url: String,
    pub count: usize,
}

/// A document summarized for a listing page
#[derive(Debug, Clone)]
pub struct CardView {
    pub url: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub reading_time: String,
    pub cover_image: Option<String>,
    pub location: Option<String>,
    pub rsvp_link: Option<String>,
    pub duration: Option<String>,
}

impl CardView {
    fn from_document(doc: &Document) -> Self {
        let (location, rsvp_link, duration) = match &doc.meta {
            DocMeta::Event(m) => (m.location.clone(), m.rsvp_link.clone(), None),
            DocMeta::Episode(m) => (None, None, m.duration.clone()),
            DocMeta::Post(_) => (None, None, None),
        };
        Self {
            url: doc.url(),
            title: doc.title().to_string(),
            date: doc.date.raw().to_string(),
            description: doc.description.clone(),
            reading_time: doc.reading_time(),
            cover_image: doc.cover_image.clone(),
            location,
            rsvp_link,
            duration,
        }
    }
}

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate<'a> {
    head: HeadMeta,
    site_title: &'a str,
    twitter_handle: Option<&'a str>,
    custom_head_html: &'a str,
    css: &'a str,
    favicon: Option<&'a str>,
    nav: Vec<NavItem>,
    support_link: Option<&'a str>,
    subscribe_url: Option<&'a str>,
    body: &'a str,
    year: i32,
    author_name: &'a str,
    socials: Vec<SocialLink>,
}

#[derive(Template)]
#[template(path = "post.html")]
struct PostTemplate<'a> {
    title: &'a str,
    date: &'a str,
    reading_time: String,
    tags: Vec<TagLink>,
    cover_image: Option<&'a str>,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "event.html")]
struct EventTemplate<'a> {
    title: &'a str,
    event_date: &'a str,
    location: Option<&'a str>,
    rsvp_link: Option<&'a str>,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "episode.html")]
struct EpisodeTemplate<'a> {
    title: &'a str,
    date: &'a str,
    duration: Option<&'a str>,
    audio_url: Option<&'a str>,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "blog_index.html")]
struct BlogIndexTemplate<'a> {
    heading: &'a str,
    cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "events_index.html")]
struct EventsIndexTemplate<'a> {
    heading: &'a str,
    cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "podcast_index.html")]
struct PodcastIndexTemplate<'a> {
    heading: &'a str,
    cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "tag.html")]
struct TagTemplate<'a> {
    name: &'a str,
    cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "tags_index.html")]
struct TagsIndexTemplate {
    tags: Vec<TagLink>,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate<'a> {
    hero_image: Option<&'a str>,
    body: &'a str,
}

fn render<T: Template>(name: &'static str, template: &T) -> Result<String, TemplateError> {
    template.render().map_err(|source| TemplateError::Render {
        template: name,
        source: Box::new(source),
    })
}

/// Production page templates, themed by the site config
pub struct AskamaTemplates {
    config: Config,
    css: String,
}

impl AskamaTemplates {
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        Ok(Self {
            css: theme_css(&config.theme)?,
            config: config.clone(),
        })
    }

    /// Header navigation for the collections built in this run
    pub fn nav(&self, site: &SiteContext) -> Vec<NavItem> {
        let mut items: Vec<NavItem> = self
            .config
            .nav_links()
            .iter()
            .map(|link| NavItem {
                label: link.label.clone(),
                url: link.url.clone(),
                external: false,
            })
            .collect();

        for kind in Kind::ALL {
            let feature = self.config.feature(kind);
            match (feature.mode, &feature.external_url) {
                (FeatureMode::Internal, _) if site.is_present(kind) => items.push(NavItem {
                    label: feature.label.clone(),
                    url: kind.index_url(),
                    external: false,
                }),
                (FeatureMode::External, Some(url)) => items.push(NavItem {
                    label: feature.label.clone(),
                    url: url.clone(),
                    external: true,
                }),
                _ => {}
            }
        }

        if site.has_tags() {
            items.push(NavItem {
                label: "Tags".to_string(),
                url: tag_directory_url(),
                external: false,
            });
        }

        items
    }

    fn post(&self, doc: &Document, meta: &PostMeta) -> Result<String, TemplateError> {
        let tags = meta
            .tags
            .iter()
            .filter_map(|tag| {
                tag_url(tag).map(|url| TagLink {
                    name: tag.clone(),
                    url,
                    count: 0,
                })
            })
            .collect();
        render(
            "post.html",
            &PostTemplate {
                title: doc.title(),
                date: doc.date.raw(),
                reading_time: doc.reading_time(),
                tags,
                cover_image: doc.cover_image.as_deref(),
                content: &doc.rendered_html,
            },
        )
    }

    fn event(&self, doc: &Document, meta: &EventMeta) -> Result<String, TemplateError> {
        render(
            "event.html",
            &EventTemplate {
                title: doc.title(),
                event_date: doc.date.raw(),
                location: meta.location.as_deref(),
                rsvp_link: meta.rsvp_link.as_deref(),
                content: &doc.rendered_html,
            },
        )
    }

    fn episode(&self, doc: &Document, meta: &EpisodeMeta) -> Result<String, TemplateError> {
        render(
            "episode.html",
            &EpisodeTemplate {
                title: doc.title(),
                date: doc.date.raw(),
                duration: meta.duration.as_deref(),
                audio_url: meta.audio_url.as_deref(),
                content: &doc.rendered_html,
            },
        )
    }
}

impl Templates for AskamaTemplates {
    fn layout(
        &self,
        site: &SiteContext,
        body_html: &str,
        title: &str,
        seo: &Seo,
    ) -> Result<String, TemplateError> {
        let config = &self.config;
        let page = LayoutTemplate {
            head: HeadMeta::new(config, title, seo),
            site_title: &config.site_title,
            twitter_handle: config.twitter_handle.as_deref(),
            custom_head_html: config.custom_head_html.as_deref().unwrap_or_default(),
            css: &self.css,
            favicon: site.favicon.as_deref(),
            nav: self.nav(site),
            support_link: config.support_link.as_deref(),
            subscribe_url: config.email_subscribe_form_url.as_deref(),
            body: body_html,
            year: site.year(),
            author_name: &config.author_name,
            socials: config
                .social_links
                .iter()
                .map(|(name, url)| SocialLink {
                    name: name.clone(),
                    url: url.clone(),
                })
                .collect(),
        };
        render("layout.html", &page)
    }

    fn home(&self, home: &HomePage) -> Result<String, TemplateError> {
        render(
            "home.html",
            &HomeTemplate {
                hero_image: home.hero_image.as_deref(),
                body: &home.body_html,
            },
        )
    }

    fn document(&self, doc: &Document) -> Result<String, TemplateError> {
        match &doc.meta {
            DocMeta::Post(meta) => self.post(doc, meta),
            DocMeta::Event(meta) => self.event(doc, meta),
            DocMeta::Episode(meta) => self.episode(doc, meta),
        }
    }

    fn collection_index(&self, collection: &Collection) -> Result<String, TemplateError> {
        let kind = collection.kind();
        let heading = self.config.feature(kind).label.as_str();
        let cards = collection.iter().map(CardView::from_document).collect();
        match kind {
            Kind::Post => render("blog_index.html", &BlogIndexTemplate { heading, cards }),
            Kind::Event => render("events_index.html", &EventsIndexTemplate { heading, cards }),
            Kind::Episode => render("podcast_index.html", &PodcastIndexTemplate { heading, cards }),
        }
    }

    fn tag_page(&self, bucket: &TagBucket<'_>) -> Result<String, TemplateError> {
        render(
            "tag.html",
            &TagTemplate {
                name: &bucket.name,
                cards: bucket
                    .posts
                    .iter()
                    .map(|doc| CardView::from_document(doc))
                    .collect(),
            },
        )
    }

    fn tag_directory(&self, index: &TagIndex<'_>) -> Result<String, TemplateError> {
        let tags = index
            .by_name()
            .into_iter()
            .map(|bucket| TagLink {
                name: bucket.name.clone(),
                url: bucket.url(),
                count: bucket.posts.len(),
            })
            .collect();
        render("tags_index.html", &TagsIndexTemplate { tags })
    }
}
