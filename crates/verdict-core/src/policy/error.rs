use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyStoreError {
    /// The backing store could not be queried.
    #[error("Policy lookup failed: {message}")]
    LookupFailed { message: String },
}
