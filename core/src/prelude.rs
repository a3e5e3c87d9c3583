use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// Common error type for every cache operation.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("invalid type: {0}")]
    InvalidType(String),
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid document: {0}")]
    Validation(String),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt collection {}: {source}", path.display())]
    CorruptCollection {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Client errors map to HTTP 400, everything else is a storage failure (500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CacheError::InvalidType(_)
                | CacheError::MissingParameter(_)
                | CacheError::Validation(_)
                | CacheError::MalformedBody(_)
        )
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// One of the four persisted document types.
///
/// Implementors are zero-sized markers; the associated document is what
/// actually lands on disk under `FILE_NAME`.
pub trait Collection: Send + Sync + 'static {
    type Document: Serialize + DeserializeOwned + Send + Sync;

    const FILE_NAME: &'static str;

    /// Seed content written on first access and restored by a reset.
    fn default_document() -> Self::Document;
}
