//! Topic candidates and topic text validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A topic suggested by the backend for a broad theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub title: String,
    pub description: String,
    /// Display string such as `"50K"`; not a number.
    pub estimated_views: String,
}

/// Validate a theme before asking for suggestions.
///
/// Returns the trimmed theme, which is what gets sent to the backend.
pub fn validate_theme(theme: &str) -> Result<&str, CoreError> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Enter a theme first".to_string()));
    }
    Ok(trimmed)
}

/// Validate a topic that is about to be used for preview or generation.
pub fn validate_topic(topic: &str) -> Result<(), CoreError> {
    if topic.trim().is_empty() {
        return Err(CoreError::Validation(
            "Select or enter a topic first".to_string(),
        ));
    }
    Ok(())
}
