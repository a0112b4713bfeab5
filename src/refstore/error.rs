use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by reference-embedding lookups.
pub enum RefStoreError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to reference store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Lookup failed.
    #[error("failed to fetch reference embeddings for building {building_id}: {message}")]
    LookupFailed {
        /// Building whose references were requested.
        building_id: i64,
        /// Error message.
        message: String,
    },
}
