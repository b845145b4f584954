use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Document {0} not found")]
    DocumentNotFound(String),

    #[error("Document {0} already exists")]
    DocumentExists(String),

    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Collection '{0}' already exists")]
    CollectionExists(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    #[error("Document is missing the required _id field")]
    MissingId,

    #[error("Type mismatch: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },

    #[error("Database file '{0}' does not exist")]
    PathNotFound(String),

    #[error("Database file '{0}' does not have a .json extension")]
    InvalidExtension(String),

    #[error("Could not generate a free document id after {0} attempts")]
    KeyGenerationExhausted(usize),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

/// Coarse classification of [`DbError`] for callers that branch on the
/// category rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    InvalidPath,
    Internal,
    Io,
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound(_) | Self::CollectionNotFound(_) => ErrorKind::NotFound,
            Self::DocumentExists(_) | Self::CollectionExists(_) => ErrorKind::AlreadyExists,
            Self::MissingId | Self::TypeMismatch { .. } | Self::InvalidCollectionName(_) => {
                ErrorKind::InvalidArgument
            }
            Self::PathNotFound(_) | Self::InvalidExtension(_) => ErrorKind::InvalidPath,
            Self::KeyGenerationExhausted(_) => ErrorKind::Internal,
            Self::IoError(_) | Self::SerializeError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, received: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            received: received.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializeError(err.to_string())
    }
}
