use anyhow::{anyhow, Result};
use std::path::Path;

use crate::models::LabelThresholds;

/// Largest top-N any aggregate may request
pub const MAX_TOP_N: usize = 1000;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate an uploaded chat export before analysis
    pub fn validate_chat_content(content: &str, max_bytes: usize) -> Result<()> {
        if content.trim().is_empty() {
            return Err(anyhow!("Chat content cannot be empty"));
        }

        if content.len() > max_bytes {
            return Err(anyhow!(
                "Chat content too large ({} bytes, max {max_bytes})",
                content.len()
            ));
        }

        if content.contains('\0') {
            return Err(anyhow!("Chat content contains NUL bytes"));
        }

        Ok(())
    }

    /// Validate a free-text message handed to the explainer
    pub fn validate_message_text(text: &str, max_chars: usize) -> Result<()> {
        let length = text.chars().count();
        if length > max_chars {
            return Err(anyhow!("Message too long ({length} characters, max {max_chars})"));
        }

        Ok(())
    }

    /// Validate file path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        if path.to_string_lossy().is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        // Check for path traversal attempts
        let path_str = path.to_string_lossy();
        if path_str.contains("..") || path_str.contains('~') {
            return Err(anyhow!("File path contains potentially dangerous characters"));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        Ok(())
    }

    /// Validate processing version
    pub fn validate_processing_version(version: &str) -> Result<()> {
        if version.trim().is_empty() {
            return Err(anyhow!("Processing version cannot be empty"));
        }

        if version.len() > 50 {
            return Err(anyhow!("Processing version too long (max 50 characters)"));
        }

        // Alphanumeric, dots, dashes, underscores
        if !version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(anyhow!("Processing version contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a pair of label boundaries
    pub fn validate_thresholds(thresholds: &LabelThresholds) -> Result<()> {
        let range = -1.0..=1.0;
        if !range.contains(&thresholds.positive) || !range.contains(&thresholds.negative) {
            return Err(anyhow!("Thresholds must lie within [-1, 1]"));
        }

        if thresholds.negative > thresholds.positive {
            return Err(anyhow!(
                "Negative threshold {} exceeds positive threshold {}",
                thresholds.negative,
                thresholds.positive
            ));
        }

        Ok(())
    }

    /// Validate a top-N limit
    pub fn validate_top_n(n: usize) -> Result<()> {
        if n == 0 {
            return Err(anyhow!("Top-N limit must be greater than 0"));
        }

        if n > MAX_TOP_N {
            return Err(anyhow!("Top-N limit too large (max {MAX_TOP_N})"));
        }

        Ok(())
    }

    /// Sanitize text input
    ///
    /// Drops control characters other than newline, tab and carriage return.
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
