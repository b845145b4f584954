pub mod config;

use crate::core::{DbError, Document, Result, expect_array, expect_object};
use crate::storage::{Collection, DatabasePath, file, validate_collection_name};
use config::ConnectionConfig;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::debug;

/// Handle to one JSON database file
///
/// The whole file is read once on open. Collections live in memory until
/// [`Connection::save`] rewrites the file from their current state.
#[derive(Debug)]
pub struct Connection {
    path: DatabasePath,
    config: ConnectionConfig,
    /// Insertion-ordered; the key order is the canonical collection list
    collections: IndexMap<String, Collection>,
}

impl Connection {
    /// Open an existing `.json` file with the default configuration
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use weekdb::Connection;
    ///
    /// # fn main() -> weekdb::Result<()> {
    /// let mut conn = Connection::open("data.json")?;
    /// let mut users = conn.add_collection("users", true)?;
    /// users.add(serde_json::json!({"name": "Ann"}).as_object().cloned().unwrap_or_default())?;
    /// users.save()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, ConnectionConfig::default())
    }

    /// Open with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: ConnectionConfig) -> Result<Self> {
        let path = DatabasePath::new(path)?;
        let root = file::read_database(path.as_path())?;

        let mut collections = IndexMap::with_capacity(root.len());
        for (name, value) in root {
            let documents = expect_array(value)?
                .into_iter()
                .map(expect_object)
                .collect::<Result<Vec<Document>>>()?;
            let collection = Collection::from_documents(name.as_str(), documents)?
                .with_key_generator(config.key_generator.clone());
            collections.insert(name, collection);
        }

        debug!(
            path = %path.as_path().display(),
            collections = collections.len(),
            "connection opened"
        );
        Ok(Self {
            path,
            config,
            collections,
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Collection names in load/creation order
    pub fn collections(&self) -> Vec<&str> {
        self.collections.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn get_collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| DbError::CollectionNotFound(name.to_string()))
    }

    pub fn get_collection_mut(&mut self, name: &str) -> Result<CollectionMut<'_>> {
        let index = self
            .collections
            .get_index_of(name)
            .ok_or_else(|| DbError::CollectionNotFound(name.to_string()))?;
        Ok(CollectionMut {
            connection: self,
            index,
        })
    }

    /// Create an empty collection. With `again`, an existing collection of
    /// the same name is returned instead of an error.
    pub fn add_collection(&mut self, name: &str, again: bool) -> Result<CollectionMut<'_>> {
        if let Some(index) = self.collections.get_index_of(name) {
            if !again {
                return Err(DbError::CollectionExists(name.to_string()));
            }
            return Ok(CollectionMut {
                connection: self,
                index,
            });
        }

        validate_collection_name(name)?;
        let collection =
            Collection::new(name)?.with_key_generator(self.config.key_generator.clone());
        let (index, _) = self.collections.insert_full(name.to_string(), collection);

        debug!(collection = %name, "collection added");
        Ok(CollectionMut {
            connection: self,
            index,
        })
    }

    /// Remove a collection, keeping the order of the others
    pub fn delete_collection(&mut self, name: &str) -> Result<Collection> {
        let collection = self
            .collections
            .shift_remove(name)
            .ok_or_else(|| DbError::CollectionNotFound(name.to_string()))?;

        debug!(collection = %name, "collection deleted");
        Ok(collection)
    }

    /// Rewrite the whole file, each collection sorted by normalized `_id`
    pub fn save(&self) -> Result<()> {
        let mut root = Document::new();
        for (name, collection) in &self.collections {
            let documents = collection
                .sorted()
                .into_iter()
                .map(|doc| Value::Object(doc.clone()))
                .collect();
            root.insert(name.clone(), Value::Array(documents));
        }

        file::write_database(self.path.as_path(), &root, self.config.pretty)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Connection:{}>", self.path.as_path().display())
    }
}

/// Mutable access to one collection that can still reach its connection.
///
/// Borrows the owning [`Connection`] exclusively, so the collection can
/// request a save without holding a reference cycle.
pub struct CollectionMut<'a> {
    connection: &'a mut Connection,
    index: usize,
}

impl CollectionMut<'_> {
    /// Save the owning connection
    pub fn save(&self) -> Result<()> {
        self.connection.save()
    }
}

impl Deref for CollectionMut<'_> {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.connection.collections[self.index]
    }
}

impl DerefMut for CollectionMut<'_> {
    fn deref_mut(&mut self) -> &mut Collection {
        &mut self.connection.collections[self.index]
    }
}
