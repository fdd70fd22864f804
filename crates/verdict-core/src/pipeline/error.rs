use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The query failed basic validation before any processing.
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}
