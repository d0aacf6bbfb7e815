/// Error types for Meeting Intel
///
/// Uses thiserror for ergonomic error handling with proper Display implementations.
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM service error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// True when the error was raised before any network attempt
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
