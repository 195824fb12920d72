//! Error types for crosside-content

/// Result type for crosside-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in crosside-content operations
///
/// Every variant describes a malformed document: either the text is not
/// valid JSON-with-comments, or it parses but lacks the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed document at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Malformed document: {message}")]
    Structure { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }
}
