use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by catalog lookups.
pub enum CatalogError {
    /// The catalog service could not be reached.
    #[error("failed to reach catalog at '{url}': {message}")]
    Unreachable {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The catalog responded with a non-success status.
    #[error("catalog query failed with status {status}: {message}")]
    QueryFailed {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The catalog response could not be decoded into [`Building`](super::Building) records.
    #[error("invalid catalog response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
