//! Collections: an accumulating set during a build run, then a sorted read-only view.

use crate::models::{Document, Kind};
use std::collections::HashSet;

/// Documents of one kind gathered during a collection run.
///
/// Only `finalize` turns it into a [`Collection`], so nothing can read a
/// partially built, unsorted set.
#[derive(Debug)]
pub struct CollectionAccumulator {
    kind: Kind,
    documents: Vec<Document>,
    slugs: HashSet<String>,
}

impl CollectionAccumulator {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            documents: Vec::new(),
            slugs: HashSet::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn contains_slug(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    /// Add a document; a duplicate slug is handed back untouched
    pub fn push(&mut self, doc: Document) -> Result<(), Document> {
        if doc.kind != self.kind || !self.slugs.insert(doc.slug.clone()) {
            return Err(doc);
        }
        self.documents.push(doc);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Sort by the kind's date key (invalid dates last, ties by slug)
    pub fn finalize(self) -> Collection {
        let order = self.kind.sort_order();
        let mut documents = self.documents;
        documents.sort_by(|a, b| {
            a.date
                .cmp_for(&b.date, order)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Collection {
            kind: self.kind,
            documents,
        }
    }
}

/// A finalized, sorted collection
#[derive(Debug)]
pub struct Collection {
    kind: Kind,
    documents: Vec<Document>,
}

impl Collection {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::doc;
    use super::*;

    fn slugs(collection: &Collection) -> Vec<&str> {
        collection.iter().map(|d| d.slug.as_str()).collect()
    }

    #[test]
    fn test_posts_sort_descending_invalid_last() {
        let mut acc = CollectionAccumulator::new(Kind::Post);
        acc.push(doc(Kind::Post, "old", Some("2024-01-01"), &[])).unwrap();
        acc.push(doc(Kind::Post, "undated", None, &[])).unwrap();
        acc.push(doc(Kind::Post, "new", Some("2025-01-01"), &[])).unwrap();

        assert_eq!(slugs(&acc.finalize()), vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_events_sort_ascending_invalid_last() {
        let mut acc = CollectionAccumulator::new(Kind::Event);
        acc.push(doc(Kind::Event, "bad", Some("tbd"), &[])).unwrap();
        acc.push(doc(Kind::Event, "late", Some("2025-09-01"), &[])).unwrap();
        acc.push(doc(Kind::Event, "early", Some("2025-02-01"), &[])).unwrap();

        assert_eq!(slugs(&acc.finalize()), vec!["early", "late", "bad"]);
    }

    #[test]
    fn test_ties_broken_by_slug() {
        let mut acc = CollectionAccumulator::new(Kind::Episode);
        acc.push(doc(Kind::Episode, "b", Some("2025-01-01"), &[])).unwrap();
        acc.push(doc(Kind::Episode, "a", Some("2025-01-01"), &[])).unwrap();

        assert_eq!(slugs(&acc.finalize()), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut acc = CollectionAccumulator::new(Kind::Post);
        acc.push(doc(Kind::Post, "same", Some("2024-01-01"), &[])).unwrap();
        let rejected = acc.push(doc(Kind::Post, "same", Some("2025-01-01"), &[]));

        assert!(rejected.is_err());
        assert!(acc.contains_slug("same"));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let mut acc = CollectionAccumulator::new(Kind::Post);
        assert!(acc.push(doc(Kind::Event, "e", None, &[])).is_err());
        assert!(acc.is_empty());
    }
}
