use crate::core::{DbError, Result};
use std::path::{Path, PathBuf};

/// Path to an existing `.json` database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePath {
    path: PathBuf,
}

impl DatabasePath {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(DbError::InvalidExtension(path.display().to_string()));
        }

        if !path.is_file() {
            return Err(DbError::PathNotFound(path.display().to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for DatabasePath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
