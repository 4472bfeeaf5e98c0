//! Configuration errors

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading, reading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No value is stored under the key.
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    /// A source could not be read (missing file, unreadable `.env`).
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// A source was read but its contents are malformed or of the wrong shape.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Settings deserialized but broke a [`Validate`](crate::Validate) rule.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A value passed to `set` could not be turned into JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored values do not fit the requested type.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A single environment variable is unset or not valid unicode.
    #[error("Environment variable {key}: {source}")]
    EnvVar {
        key: String,
        #[source]
        source: std::env::VarError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_env_var_error_names_the_variable() {
        let err = ConfigError::EnvVar {
            key: "MAILVIEW_MASTER_NAME".to_string(),
            source: std::env::VarError::NotPresent,
        };

        assert!(err.to_string().starts_with("Environment variable MAILVIEW_MASTER_NAME:"));
        assert!(err.source().is_some());
    }
}
