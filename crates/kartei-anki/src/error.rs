/// Failure at the storage boundary
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Collection error: {0}")]
    Backend(String),

    #[error("Collection returned null result for {0}")]
    NullResult(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Invalid card: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] CollectionError),
}

/// Audio could not be written. Never fails a save; only logged.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write media file {filename}: {source}")]
pub struct MediaWriteError {
    pub filename: String,
    #[source]
    pub source: CollectionError,
}
