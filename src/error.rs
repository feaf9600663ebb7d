//! Error types for the grid engine

use thiserror::Error;

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the grid engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (bad root margin, out-of-range threshold, ...)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An element handle did not resolve to a live node
    #[error("Invalid element handle: {0}")]
    Node(String),

    /// A selector string could not be parsed
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// Failed to render or serialize the document
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Item data could not be decoded
    #[error("Invalid item data: {0}")]
    Data(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Data(err.to_string())
    }
}
