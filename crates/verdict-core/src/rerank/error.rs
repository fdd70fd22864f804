use thiserror::Error;

#[derive(Error, Debug)]
pub enum RerankError {
    /// The scoring service could not be reached or returned a failure status.
    #[error("Rerank request to '{url}' failed: {message}")]
    RequestFailed { url: String, message: String },

    /// The scoring service returned a body we could not parse.
    #[error("Invalid rerank response: {message}")]
    InvalidResponse { message: String },

    /// The scoring service returned the wrong number of scores.
    #[error("Rerank score count mismatch: expected {expected}, got {actual}")]
    ScoreCountMismatch { expected: usize, actual: usize },
}
