//! Error types for view rendering

use thiserror::Error;

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors that can occur while resolving or rendering views
#[derive(Error, Debug)]
pub enum ViewError {
    /// No candidate location held the view
    #[error("View '{name}' not found (searched: {})", .searched.join(", "))]
    ViewNotFound { name: String, searched: Vec<String> },

    /// Empty or otherwise unusable view name
    #[error("Invalid view name: {0:?}")]
    InvalidViewName(String),

    /// Template rendering error
    #[error("Template rendering error: {0}")]
    RenderError(String),

    /// Template parsing error
    #[error("Template parsing error: {0}")]
    ParseError(String),

    /// IO error when loading views
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<handlebars::RenderError> for ViewError {
    fn from(err: handlebars::RenderError) -> Self {
        ViewError::RenderError(err.to_string())
    }
}

impl From<handlebars::TemplateError> for ViewError {
    fn from(err: handlebars::TemplateError) -> Self {
        ViewError::ParseError(err.to_string())
    }
}

#[cfg(feature = "tera")]
impl From<tera::Error> for ViewError {
    fn from(err: tera::Error) -> Self {
        use std::error::Error as _;

        // tera keeps the useful part of the message in the source chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ViewError::RenderError(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_candidates() {
        let err = ViewError::ViewNotFound {
            name: "Welcome".to_string(),
            searched: vec!["UserMailer/Welcome".to_string(), "shared/Welcome".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("'Welcome'"));
        assert!(message.contains("UserMailer/Welcome, shared/Welcome"));
    }
}
