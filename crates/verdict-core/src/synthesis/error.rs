use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The model call failed or timed out.
    #[error("Synthesis request failed: {message}")]
    RequestFailed { message: String },

    /// The model returned no usable text.
    #[error("Synthesis produced an empty answer")]
    EmptyAnswer,
}
