//! Error types for schema loading.

use thiserror::Error;

/// Error type for schema loading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document root is neither a root node nor a program node.
    #[error("unexpected document kind '{kind}', expected 'rootNode' or 'programNode'")]
    UnexpectedRoot {
        /// Kind found at the document root.
        kind: String,
    },

    /// A bytes payload does not match its declared encoding.
    #[error("invalid {encoding} bytes: {message}")]
    InvalidBytes {
        /// Declared encoding.
        encoding: String,
        /// Decoder message.
        message: String,
    },
}

impl ParseError {
    /// Creates an invalid bytes error.
    pub fn invalid_bytes(encoding: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidBytes {
            encoding: encoding.into(),
            message: message.to_string(),
        }
    }
}
