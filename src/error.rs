use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ProjviewError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    /// The requested path resolves outside the extraction root.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),
    #[error("Document extraction failed: {0}")]
    Document(String),
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
impl ProjviewError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProjviewError::Io {
            path: path.into(),
            source,
        }
    }
}
