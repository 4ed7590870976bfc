//! RSS 2.0 feeds for posts (`rss.xml`) and podcast episodes (`feed.xml`).

use crate::collection::Collection;
use crate::config::Config;
use crate::models::{DocMeta, Document, EpisodeMeta, Kind};
use chrono::{DateTime, Utc};
use rss::extension::itunes::ITunesItemExtensionBuilder;
use rss::{validation::Validate, ChannelBuilder, EnclosureBuilder, GuidBuilder, ItemBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Posts feed
pub const POSTS_FEED: &str = "rss.xml";
/// Podcast feed
pub const EPISODES_FEED: &str = "feed.xml";

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Feed file name for a kind; events have none
pub fn feed_file(kind: Kind) -> Option<&'static str> {
    match kind {
        Kind::Post => Some(POSTS_FEED),
        Kind::Episode => Some(EPISODES_FEED),
        Kind::Event => None,
    }
}

/// Feed over one finalized collection, items in collection order
pub struct Feed<'a> {
    config: &'a Config,
    collection: &'a Collection,
    build_time: DateTime<Utc>,
}

impl<'a> Feed<'a> {
    pub fn new(config: &'a Config, collection: &'a Collection, build_time: DateTime<Utc>) -> Self {
        Self {
            config,
            collection,
            build_time,
        }
    }

    /// Generate the channel XML
    pub fn into_xml(self) -> String {
        let kind = self.collection.kind();
        let items: Vec<rss::Item> = self
            .collection
            .iter()
            .map(|doc| document_to_item(doc, self.config))
            .collect();

        let title = match kind {
            Kind::Episode => format!("{} Podcast", self.config.site_title),
            _ => self.config.site_title.clone(),
        };

        let mut namespaces = BTreeMap::new();
        if kind == Kind::Episode {
            namespaces.insert("content".to_string(), CONTENT_NS.to_string());
        }

        let channel = ChannelBuilder::default()
            .title(title)
            .link(self.config.absolute_url("/"))
            .description(self.config.site_description.clone())
            .generator(Some("solopress".to_string()))
            .last_build_date(Some(self.build_time.to_rfc2822()))
            .namespaces(namespaces)
            .items(items)
            .build();

        if let Err(err) = channel.validate() {
            tracing::warn!("{} feed failed validation: {}", kind.dir(), err);
        }

        channel.to_string()
    }

    /// Write the feed under `output_dir`; `None` for kinds without a feed
    pub fn write(self, output_dir: &Path) -> std::io::Result<Option<PathBuf>> {
        let Some(file) = feed_file(self.collection.kind()) else {
            return Ok(None);
        };

        let path = output_dir.join(file);
        let count = self.collection.len();
        fs::write(&path, self.into_xml())?;
        tracing::info!("Wrote {} ({} items)", file, count);
        Ok(Some(path))
    }
}

fn document_to_item(doc: &Document, config: &Config) -> rss::Item {
    let link = config.absolute_url(&doc.url());
    let pub_date = doc.date.timestamp().map(|at| at.and_utc().to_rfc2822());

    let mut item = ItemBuilder::default()
        .title(Some(doc.title().to_string()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(doc.description.clone()))
        .pub_date(pub_date)
        .build();

    if let DocMeta::Episode(episode) = &doc.meta {
        item.set_content(Some(doc.rendered_html.clone()));
        item.set_enclosure(enclosure_for(episode, config));
        if let Some(duration) = &episode.duration {
            item.set_itunes_ext(Some(
                ITunesItemExtensionBuilder::default()
                    .duration(Some(duration.clone()))
                    .build(),
            ));
        }
    }

    item
}

fn enclosure_for(episode: &EpisodeMeta, config: &Config) -> Option<rss::Enclosure> {
    let audio_url = episode.audio_url.as_deref()?;
    Some(
        EnclosureBuilder::default()
            .url(config.absolute_url(audio_url))
            .length(episode.length_bytes.unwrap_or(0).to_string())
            .mime_type(audio_mime(audio_url).to_string())
            .build(),
    )
}

/// MIME type guessed from the audio file extension
pub fn audio_mime(url: &str) -> &'static str {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        _ => DEFAULT_AUDIO_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::test_support::doc;
    use crate::collection::CollectionAccumulator;
    use chrono::TimeZone;

    fn config() -> Config {
        Config::from_yaml_str(
            "site_title: Test Site\nsite_description: A test\ndomain: https://example.org/\nnav_links: []\n",
        )
        .unwrap()
    }

    fn build_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_posts_feed_items_in_collection_order() {
        let mut acc = CollectionAccumulator::new(Kind::Post);
        acc.push(doc(Kind::Post, "older", Some("2025-01-01"), &[])).unwrap();
        acc.push(doc(Kind::Post, "newer", Some("2025-03-01"), &[])).unwrap();
        acc.push(doc(Kind::Post, "undated", None, &[])).unwrap();
        let posts = acc.finalize();
        let config = config();

        let xml = Feed::new(&config, &posts, build_time()).into_xml();

        assert!(xml.contains("<title>Test Site</title>"));
        assert!(xml.contains("<link>https://example.org/blog/newer.html</link>"));
        assert!(xml.contains("<lastBuildDate>Thu, 15 May 2025 12:00:00 +0000</lastBuildDate>"));
        let newer = xml.find("newer.html").unwrap();
        let older = xml.find("older.html").unwrap();
        let undated = xml.find("undated.html").unwrap();
        assert!(newer < older && older < undated);
        assert_eq!(xml.matches("<pubDate>").count(), 2);
    }

    #[test]
    fn test_episode_enclosure_and_duration() {
        let mut episode = doc(Kind::Episode, "pilot", Some("2025-02-01"), &[]);
        if let DocMeta::Episode(meta) = &mut episode.meta {
            meta.audio_url = Some("/audio/pilot.m4a".to_string());
            meta.length_bytes = Some(1234);
            meta.duration = Some("00:42:00".to_string());
        }
        episode.rendered_html = "<p>Show notes</p>".to_string();

        let mut acc = CollectionAccumulator::new(Kind::Episode);
        acc.push(episode).unwrap();
        let episodes = acc.finalize();
        let config = config();

        let xml = Feed::new(&config, &episodes, build_time()).into_xml();

        assert!(xml.contains("<title>Test Site Podcast</title>"));
        assert!(xml.contains("url=\"https://example.org/audio/pilot.m4a\""));
        assert!(xml.contains("length=\"1234\""));
        assert!(xml.contains("type=\"audio/mp4\""));
        assert!(xml.contains("00:42:00"));
        assert!(xml.contains("content:encoded"));
        assert!(xml.contains("Show notes"));
    }

    #[test]
    fn test_events_have_no_feed() {
        let dir = tempfile::tempdir().unwrap();
        let events = CollectionAccumulator::new(Kind::Event).finalize();
        let config = config();
        let written = Feed::new(&config, &events, build_time())
            .write(dir.path())
            .unwrap();
        assert!(written.is_none());
    }

    #[test]
    fn test_audio_mime() {
        assert_eq!(audio_mime("https://cdn.example/ep1.MP3"), "audio/mpeg");
        assert_eq!(audio_mime("/a/ep.ogg?dl=1"), "audio/ogg");
        assert_eq!(audio_mime("/a/stream"), "audio/mpeg");
    }
}
