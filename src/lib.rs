// ============================================================================
// WeekDB Library
// ============================================================================

//! Embedded document store backed by a single JSON file.
//!
//! A [`Connection`] reads the file once into named [`Collection`]s. All reads
//! and writes happen in memory; [`Connection::save`] rewrites the whole file.
//!
//! ```no_run
//! use serde_json::json;
//! use weekdb::{expect_object, Connection};
//!
//! # fn main() -> weekdb::Result<()> {
//! let mut conn = Connection::open("data.json")?;
//! let mut users = conn.add_collection("users", true)?;
//!
//! let id = users.add(expect_object(json!({"name": "Ann"}))?)?["_id"].clone();
//! assert!(users.exists(&id));
//!
//! users.save()?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod core;
pub mod storage;

pub use crate::core::{
    DbError, Document, DocumentKey, ErrorKind, ID_FIELD, NormalizedKey, Result, expect_array,
    expect_object, expect_str, normalize,
};
pub use connection::{CollectionMut, Connection, config::ConnectionConfig};
pub use storage::{Collection, DatabasePath, KeyGenerator};
