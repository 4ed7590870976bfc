//! Tag index over the finalized posts collection.

use crate::collection::Collection;
use crate::models::{Diagnostic, Document};
use crate::slug::slugify;
use std::collections::{BTreeMap, HashSet};

/// Output directory of tag pages
pub const TAGS_DIR: &str = "tags";

/// Stem of the tag directory page; no tag page may use it
const DIRECTORY_STEM: &str = "index";

/// Page slug of a tag, `None` when nothing usable remains after slugging.
///
/// A tag that slugs to the directory stem gets a `-tag` suffix so its page
/// and `tags/index.html` never share a file.
pub fn tag_slug(tag: &str) -> Option<String> {
    let slug = slugify(tag);
    match slug.as_str() {
        "" => None,
        DIRECTORY_STEM => Some(format!("{}-tag", slug)),
        _ => Some(slug),
    }
}

/// URL of a tag's page; `None` for tags that get no page
pub fn tag_url(tag: &str) -> Option<String> {
    tag_slug(tag).map(|slug| format!("/{}/{}.html", TAGS_DIR, slug))
}

/// Output path of the tag directory page
pub fn tag_directory_rel_path() -> String {
    format!("{}/{}.html", TAGS_DIR, DIRECTORY_STEM)
}

pub fn tag_directory_url() -> String {
    format!("/{}", tag_directory_rel_path())
}

/// Posts sharing one tag, in collection order
#[derive(Debug)]
pub struct TagBucket<'a> {
    pub slug: String,
    /// Display name from the first post that used the tag
    pub name: String,
    pub posts: Vec<&'a Document>,
}

impl TagBucket<'_> {
    pub fn url(&self) -> String {
        format!("/{}/{}.html", TAGS_DIR, self.slug)
    }

    pub fn output_rel_path(&self) -> String {
        format!("{}/{}.html", TAGS_DIR, self.slug)
    }
}

/// Tag slug to bucket, rebuilt every build
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    buckets: BTreeMap<String, TagBucket<'a>>,
}

impl<'a> TagIndex<'a> {
    /// Bucket every post under each of its tags.
    ///
    /// Only posts carry tags, so other collections produce an empty index.
    /// Tags that slugify to nothing are dropped with a warning diagnostic.
    pub fn from_collection(posts: &'a Collection, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut buckets: BTreeMap<String, TagBucket<'a>> = BTreeMap::new();

        for post in posts {
            let mut seen = HashSet::new();
            for tag in post.tags() {
                let Some(slug) = tag_slug(tag) else {
                    tracing::warn!("Ignoring tag '{}' on {}: empty slug", tag, post.slug);
                    diagnostics.push(Diagnostic::warning(
                        "tag.empty-slug",
                        format!("Tag '{}' on {} has no usable characters", tag, post.slug),
                        Some(post.source_path.to_string_lossy().into_owned()),
                    ));
                    continue;
                };
                if !seen.insert(slug.clone()) {
                    continue;
                }

                buckets
                    .entry(slug.clone())
                    .or_insert_with(|| TagBucket {
                        slug,
                        name: tag.trim().to_string(),
                        posts: Vec::new(),
                    })
                    .posts
                    .push(post);
            }
        }

        Self { buckets }
    }

    pub fn get(&self, slug: &str) -> Option<&TagBucket<'a>> {
        self.buckets.get(slug)
    }

    /// Buckets in slug order
    pub fn buckets(&self) -> impl Iterator<Item = &TagBucket<'a>> {
        self.buckets.values()
    }

    /// Buckets ordered alphabetically by display name
    pub fn by_name(&self) -> Vec<&TagBucket<'a>> {
        let mut sorted: Vec<&TagBucket<'a>> = self.buckets.values().collect();
        sorted.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        sorted
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
