use super::index::{IdentityIndex, find_document};
use super::keygen::KeyGenerator;
use crate::core::{DbError, Document, DocumentKey, ID_FIELD, Result, normalize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DbError::InvalidCollectionName(
            "Collection name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn doc_label(key: &DocumentKey) -> String {
    format!("<doc_id:{}>", key)
}

/// Number of `params` fields present in `doc` with an equal value.
fn matching_fields(doc: &Document, params: &Document) -> usize {
    params
        .iter()
        .filter(|(field, value)| doc.get(field.as_str()) == Some(*value))
        .count()
}

/// Named, ordered set of documents.
///
/// Documents stay in insertion (or load) order. Every identity-keyed
/// operation goes through a freshly built [`IdentityIndex`], so lookups are
/// O(n log n) and resolve normalization collisions to the earliest document.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
    key_generator: KeyGenerator,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::from_documents(name, Vec::new())
    }

    pub fn from_documents(name: impl Into<String>, documents: Vec<Document>) -> Result<Self> {
        let name = name.into();
        validate_collection_name(&name)?;

        if documents.iter().any(|doc| !doc.contains_key(ID_FIELD)) {
            return Err(DbError::MissingId);
        }

        let index = IdentityIndex::build(&documents);
        for key in index.collisions() {
            warn!(
                collection = %name,
                key = %key,
                "documents share a normalized identity, lookups resolve to the first"
            );
        }

        Ok(Self {
            name,
            documents,
            key_generator: KeyGenerator::default(),
        })
    }

    /// Replace the generator used for documents added without `_id`
    pub fn with_key_generator(mut self, key_generator: KeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live documents in insertion order; not sorted by identity.
    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    fn position(&self, key: &DocumentKey) -> Option<usize> {
        find_document(&self.documents, key)
    }

    fn require_position(&self, key: &DocumentKey) -> Result<usize> {
        self.position(key)
            .ok_or_else(|| DbError::DocumentNotFound(doc_label(key)))
    }

    pub fn get(&self, id: impl Into<DocumentKey>) -> Result<&Document> {
        let position = self.require_position(&id.into())?;
        Ok(&self.documents[position])
    }

    pub fn exists(&self, id: impl Into<DocumentKey>) -> bool {
        self.position(&id.into()).is_some()
    }

    /// Most recently appended document.
    pub fn last(&self) -> Option<&Document> {
        self.documents.last()
    }

    /// The last `count` documents, most recent first. Returns fewer when the
    /// collection is shorter than `count`.
    pub fn last_n(&self, count: usize) -> Vec<&Document> {
        self.documents.iter().rev().take(count).collect()
    }

    /// Documents carrying every field of `params` with an equal value.
    pub fn filter(&self, params: &Document) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|doc| matching_fields(doc, params) == params.len())
            .collect()
    }

    /// Documents matching none of the fields of `params`.
    pub fn exclude(&self, params: &Document) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|doc| matching_fields(doc, params) == 0)
            .collect()
    }

    /// Append a document, generating an `_id` when it has none.
    pub fn add(&mut self, mut data: Document) -> Result<&Document> {
        match data.get(ID_FIELD) {
            Some(id) => {
                let key = DocumentKey::from_value(id);
                if self.position(&key).is_some() {
                    return Err(DbError::DocumentExists(doc_label(&key)));
                }
            }
            None => {
                let index = IdentityIndex::build(&self.documents);
                let id = self
                    .key_generator
                    .generate_unique(|candidate| index.search(&normalize(candidate)).is_some())?;
                data.insert(ID_FIELD.to_string(), Value::String(id));
            }
        }

        debug!(collection = %self.name, id = %DocumentKey::of(&data), "document added");
        let position = self.documents.len();
        self.documents.push(data);
        Ok(&self.documents[position])
    }

    /// Replace the stored document with the same identity as `data`.
    pub fn update(&mut self, data: Document) -> Result<&Document> {
        let key = match data.get(ID_FIELD) {
            Some(id) => DocumentKey::from_value(id),
            None => return Err(DbError::MissingId),
        };
        let position = self.require_position(&key)?;

        debug!(collection = %self.name, id = %key, "document updated");
        self.documents[position] = data;
        Ok(&self.documents[position])
    }

    pub fn delete(&mut self, id: impl Into<DocumentKey>) -> Result<Document> {
        let key = id.into();
        let position = self.require_position(&key)?;

        debug!(collection = %self.name, id = %key, "document deleted");
        Ok(self.documents.remove(position))
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Documents in ascending normalized identity order, as written on save.
    pub fn sorted(&self) -> Vec<&Document> {
        IdentityIndex::build(&self.documents)
            .positions()
            .map(|position| &self.documents[position])
            .collect()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Collection:{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expect_object;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        expect_object(value).unwrap()
    }

    fn sample() -> Collection {
        Collection::from_documents(
            "items",
            vec![
                doc(json!({"_id": 1, "x": 1})),
                doc(json!({"_id": 2, "x": 2})),
                doc(json!({"_id": 3, "x": 1, "y": 9})),
            ],
        )
        .unwrap()
    }

    fn ids(docs: &[&Document]) -> Vec<Value> {
        docs.iter().map(|d| d[ID_FIELD].clone()).collect()
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(Collection::new(""), Err(DbError::InvalidCollectionName(_))));
    }

    #[test]
    fn test_load_without_id_rejected() {
        let result = Collection::from_documents("items", vec![doc(json!({"x": 1}))]);
        assert!(matches!(result, Err(DbError::MissingId)));
    }

    #[test]
    fn test_filter_keeps_original_order() {
        let items = sample();
        let found = items.filter(&doc(json!({"x": 1})));
        assert_eq!(ids(&found), vec![json!(1), json!(3)]);

        let found = items.filter(&doc(json!({"x": 1, "y": 9})));
        assert_eq!(ids(&found), vec![json!(3)]);

        assert!(items.filter(&doc(json!({"z": 1}))).is_empty());
    }

    #[test]
    fn test_exclude_keeps_documents_missing_fields() {
        let items = sample();
        assert_eq!(ids(&items.exclude(&doc(json!({"x": 1})))), vec![json!(2)]);
        assert_eq!(ids(&items.exclude(&doc(json!({"y": 9})))), vec![json!(1), json!(2)]);
        assert_eq!(items.exclude(&doc(json!({"z": 0}))).len(), 3);
    }

    #[test]
    fn test_empty_params_return_everything() {
        let items = sample();
        assert_eq!(items.filter(&Document::new()).len(), 3);
        assert_eq!(items.exclude(&Document::new()).len(), 3);
    }

    #[test]
    fn test_last_and_last_n() {
        let items = sample();
        assert_eq!(items.last().unwrap()[ID_FIELD], json!(3));
        assert_eq!(ids(&items.last_n(2)), vec![json!(3), json!(2)]);
        assert_eq!(items.last_n(10).len(), 3);
        assert!(items.last_n(0).is_empty());
        assert!(Collection::new("empty").unwrap().last().is_none());
    }

    #[test]
    fn test_add_generates_id() {
        let mut users = Collection::new("users").unwrap();
        let stored = users.add(doc(json!({"name": "Ann"}))).unwrap().clone();

        let id = stored[ID_FIELD].as_str().unwrap().to_string();
        assert_eq!(id.matches("///").count(), 2);
        assert!(users.exists(id.as_str()));
        assert_eq!(users.get(id.as_str()).unwrap(), &stored);
        assert_eq!(stored.keys().collect::<Vec<_>>(), vec!["name", "_id"]);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut items = sample();
        let err = items.add(doc(json!({"_id": 2, "x": 5}))).unwrap_err();
        assert!(matches!(err, DbError::DocumentExists(_)));
        assert_eq!(items.count(), 3);
        assert_eq!(items.get(2).unwrap()["x"], json!(2));
    }

    #[test]
    fn test_add_colliding_identity_rejected() {
        let mut items = Collection::new("items").unwrap();
        items.add(doc(json!({"_id": 9798}))).unwrap();
        assert!(items.add(doc(json!({"_id": "ab"}))).is_err());
        assert_eq!(items.count(), 1);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut items = sample();
        items.update(doc(json!({"_id": 2, "x": 20}))).unwrap();
        assert_eq!(items.count(), 3);
        assert_eq!(items.all()[1], doc(json!({"_id": 2, "x": 20})));
    }

    #[test]
    fn test_update_errors() {
        let mut items = sample();
        assert!(matches!(items.update(doc(json!({"x": 1}))), Err(DbError::MissingId)));
        assert!(matches!(
            items.update(doc(json!({"_id": 99}))),
            Err(DbError::DocumentNotFound(_))
        ));
        assert_eq!(items.get(1).unwrap()["x"], json!(1));
    }

    #[test]
    fn test_delete() {
        let mut items = sample();
        let removed = items.delete(2).unwrap();
        assert_eq!(removed[ID_FIELD], json!(2));
        assert!(!items.exists(2));
        assert_eq!(ids(&items.all().iter().collect::<Vec<_>>()), vec![json!(1), json!(3)]);

        match items.delete(2) {
            Err(DbError::DocumentNotFound(label)) => assert_eq!(label, "<doc_id:2>"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_sorted_by_normalized_identity() {
        let items = Collection::from_documents(
            "mixed",
            vec![
                doc(json!({"_id": "b"})),
                doc(json!({"_id": 100})),
                doc(json!({"_id": 7})),
                doc(json!({"_id": "a"})),
            ],
        )
        .unwrap();
        assert_eq!(
            ids(&items.sorted()),
            vec![json!(7), json!("a"), json!("b"), json!(100)]
        );
        assert_eq!(items.all()[0][ID_FIELD], json!("b"));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "<Collection:items>");
    }
}
