//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Unsupported format and malformed content abort an import outright;
/// the remaining variants wrap store and decoding failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse {file}: {reason}")]
    MalformedContent { file: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed content error for a file or archive entry
    pub fn malformed(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedContent {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_the_file() {
        let err = Error::UnsupportedFormat("report.docx".to_string());
        assert!(err.to_string().contains("report.docx"));
    }

    #[test]
    fn test_malformed_carries_file_and_reason() {
        let err = Error::malformed("trades.json", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("trades.json"));
        assert!(msg.contains("expected value"));
    }
}
