//! Error types for relframe

use thiserror::Error;

/// Crate-wide error.
///
/// Generation itself is total; failures only come from configuration,
/// storage, or malformed input lines.
#[derive(Error, Debug)]
pub enum GameError {
    /// Settings make a round impossible (no frame enabled, bad value, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Settings or history could not be read or written
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Input line the command parser does not understand
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

impl GameError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}
