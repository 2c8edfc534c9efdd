//! Common error types for Recordify

use thiserror::Error;

use crate::identifier::IdentifierError;

/// Common result type for Recordify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spotify link or URI could not be normalized
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),
}

impl Error {
    /// True for errors caused by the caller's input (safe to report as 400)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidIdentifier(_))
    }
}
