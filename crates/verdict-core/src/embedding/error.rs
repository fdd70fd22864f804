use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding backends.
pub enum EmbeddingError {
    /// The remote embedding call failed.
    #[error("embedding request to '{url}' failed: {message}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The remote service returned an unusable body.
    #[error("invalid embedding response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },

    /// The returned vector had the wrong dimension.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}
