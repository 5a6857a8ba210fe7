//! Error types for the chat-sentiment library.
//!
//! This module provides custom error types using `thiserror` so that each layer
//! (parser, scorer, pipeline, jobs) can report what went wrong without relying
//! on log output alone.

use thiserror::Error;

/// Errors that can occur while analyzing a chat export.
#[derive(Error, Debug)]
pub enum ChatSentimentError {
    /// The export contained no line matching the message-start pattern
    #[error("No valid messages found in chat file ({failed_lines} unparsed lines)")]
    NoValidMessages {
        /// Number of lines that could not be attached to any message
        failed_lines: usize,
    },

    /// A sentiment scorer failed internally
    #[error("Scorer '{scorer}' failed: {reason}")]
    Scorer {
        /// Name of the failing scorer
        scorer: &'static str,
        /// Human-readable failure reason
        reason: String,
    },

    /// Text handed to a scorer exceeds the configured length limit
    #[error("Text too long for scoring: {length} characters (max {max})")]
    TextTooLong {
        /// Length of the rejected text in characters
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Rejected caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown job identifier
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// A job did not reach a terminal state in time
    #[error("Timed out waiting for job {0}")]
    JobTimeout(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration source errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Regex compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `ChatSentimentError`
pub type Result<T> = std::result::Result<T, ChatSentimentError>;

impl From<anyhow::Error> for ChatSentimentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
