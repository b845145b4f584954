use crate::core::{Document, DocumentKey, NormalizedKey};

/// Sorted `(normalized _id, position)` pairs over a document slice.
///
/// Built fresh for every lookup; the collection itself stays in insertion
/// order. The sort is stable, so documents whose identities normalize to the
/// same key keep their original relative order and a search always resolves
/// to the lowest original position among them.
pub struct IdentityIndex {
    entries: Vec<(NormalizedKey, usize)>,
}

impl IdentityIndex {
    pub fn build(documents: &[Document]) -> Self {
        let mut entries: Vec<(NormalizedKey, usize)> = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| (DocumentKey::of(doc).normalize(), position))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// Position of the first document whose identity normalizes to `key`.
    pub fn search(&self, key: &NormalizedKey) -> Option<usize> {
        let lower = self.entries.partition_point(|(candidate, _)| candidate < key);
        match self.entries.get(lower) {
            Some((candidate, position)) if candidate == key => Some(*position),
            _ => None,
        }
    }

    /// Original positions in ascending identity order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(_, position)| *position)
    }

    /// Normalized keys that occur more than once.
    pub fn collisions(&self) -> Vec<&NormalizedKey> {
        let mut found: Vec<&NormalizedKey> = Vec::new();
        for pair in self.entries.windows(2) {
            if pair[0].0 == pair[1].0 && found.last() != Some(&&pair[0].0) {
                found.push(&pair[0].0);
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find the position of `key` in `documents`.
pub fn find_document(documents: &[Document], key: &DocumentKey) -> Option<usize> {
    IdentityIndex::build(documents).search(&key.normalize())
}
