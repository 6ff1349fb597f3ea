use std::path::PathBuf;

/// Errors raised while reading or writing dataset files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid JSON in {}: {message}", path.display())]
    InvalidJson { path: PathBuf, message: String },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("no free id left for customer {id_pelanggan}: dataset already uses id {max_id}")]
    IdExhausted { id_pelanggan: String, max_id: u64 },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short operator hint printed under the error line.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StoreError::NotFound(_) => Some("make sure the dataset file exists (see --dataset)"),
            StoreError::InvalidJson { .. } => Some("make sure the file holds a valid JSON array"),
            StoreError::IdExhausted { .. } => Some("renumber the dataset ids before merging again"),
            _ => None,
        }
    }
}
