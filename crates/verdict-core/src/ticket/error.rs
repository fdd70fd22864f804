use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicketError {
    /// The ticketing endpoint could not be reached or rejected the request.
    #[error("Ticket request to '{url}' failed: {message}")]
    RequestFailed { url: String, message: String },

    /// The ticketing endpoint returned a body we could not parse.
    #[error("Invalid ticket response: {message}")]
    InvalidResponse { message: String },
}
