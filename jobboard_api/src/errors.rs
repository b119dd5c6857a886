//! Error types for the board client.

/// Errors that can occur when fetching pages from the board.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The base URL or a listing link could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The board returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
