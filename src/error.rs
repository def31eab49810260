use thiserror::Error;

/// Errors surfaced by the store and the pipeline.
///
/// Upstream "not found" is not an error: the pipeline reports it through
/// [`crate::pipeline::FetchOutcome`]. These variants cover the two failure
/// classes that do abort an operation: a payload the sanitizer cannot use,
/// and a persistence failure (which always rolls back the whole record).
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to process pokemon data")]
    MalformedPayload,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
