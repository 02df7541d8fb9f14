//! Error types for Kiosk.

use thiserror::Error;

/// Library-level error type for Kiosk operations.
#[derive(Error, Debug)]
pub enum KioskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing {0}")]
    MissingCredential(&'static str),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript error: {0}")]
    Transcript(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

/// Result type alias for Kiosk operations.
pub type Result<T> = std::result::Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err = KioskError::MissingCredential("NEWS_API_KEY");
        assert_eq!(err.to_string(), "Missing NEWS_API_KEY");
    }

    #[test]
    fn test_empty_result_is_bare_message() {
        let err = KioskError::EmptyResult("No articles found.".to_string());
        assert_eq!(err.to_string(), "No articles found.");
    }
}
