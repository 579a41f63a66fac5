use thiserror::Error;

use crate::validation::ValidationError;

/// All the ways things can go wrong in LinkVault
#[derive(Error, Debug)]
pub enum Error {
    /// Form input rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered with a non-2xx status; the text is what it told us
    #[error("{0}")]
    ApiError(String),

    /// The API could not be reached or sent back something unreadable
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Text to show the user for a failed operation.
    ///
    /// Server-supplied and validation messages are shown as-is; everything
    /// else collapses to the operation's own fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(err) => err.to_string(),
            Error::ApiError(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
