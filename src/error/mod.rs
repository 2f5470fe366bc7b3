//! Error types for Kigo.

use thiserror::Error;

/// Primary error type for all Kigo operations.
#[derive(Error, Debug)]
pub enum KigoError {
    /// The uploaded clip could not be decoded into linear PCM. Terminal for
    /// the request; the speech backend is never invoked.
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// A bearer credential was required but not supplied.
    #[error("Missing credential for hosted inference")]
    MissingCredential,

    /// A speech or generation backend failed after being handed valid input.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl KigoError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error means the request itself was unusable, as opposed
    /// to a collaborator failing.
    pub fn is_terminal_input_error(&self) -> bool {
        matches!(self, Self::InvalidAudio(_) | Self::MissingCredential)
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, KigoError>;
