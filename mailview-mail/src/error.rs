//! Mail error types.

use mailview_config::ConfigError;
use mailview_views::ViewError;
use thiserror::Error;

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Mail errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// A required argument was not supplied.
    #[error("{0} cannot be null")]
    NullArgument(&'static str),

    /// Rendering needs a request context and none was available.
    #[error("No request context available to render views for {0}; enter a request, supply one with `with_request`, or enable test mode")]
    MissingContext(String),

    /// View lookup or rendering failed.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid header name or value.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Building the outgoing message failed.
    #[error("Message error: {0}")]
    Message(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_argument_message() {
        let err = MailError::NullArgument("mail_message");
        assert_eq!(err.to_string(), "mail_message cannot be null");
    }

    #[test]
    fn test_view_error_is_transparent() {
        let view_err = ViewError::RenderError("boom".to_string());
        let expected = view_err.to_string();

        let err = MailError::from(view_err);
        assert_eq!(err.to_string(), expected);
        assert!(matches!(err, MailError::View(ViewError::RenderError(_))));
    }
}
