//! Whole-file reads and writes of the JSON database.
//!
//! The file is a single JSON object, collection name to document array.
//! Writes replace the entire file in place: there is no temporary file and no
//! fsync, so a crash midway can leave a truncated file behind.

use crate::core::{Document, Result, expect_object};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read the top-level object. An empty or malformed file reads as `{}`.
pub fn read_database(path: &Path) -> Result<Document> {
    let contents = fs::read_to_string(path)?;

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            if !contents.trim().is_empty() {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "database file is not valid JSON, starting empty"
                );
            }
            return Ok(Document::new());
        }
    };

    let root = expect_object(value)?;
    debug!(path = %path.display(), collections = root.len(), "database file read");
    Ok(root)
}

/// Overwrite the file with `root`.
pub fn write_database(path: &Path, root: &Document, pretty: bool) -> Result<()> {
    let serialized = if pretty {
        serde_json::to_string_pretty(root)?
    } else {
        serde_json::to_string(root)?
    };
    fs::write(path, serialized)?;
    debug!(path = %path.display(), collections = root.len(), "database file written");
    Ok(())
}
