//! Error types for followgraph.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Config(_) | Self::Internal(_)
        )
    }
}

// === From implementations ===

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_not_server_errors() {
        assert!(!AppError::NotFound("request".to_string()).is_server_error());
        assert!(!AppError::Validation("self".to_string()).is_server_error());
        assert!(!AppError::Conflict("pending".to_string()).is_server_error());
    }

    #[test]
    fn test_server_errors() {
        assert!(AppError::Database("closed".to_string()).is_server_error());
        assert!(AppError::Internal("boom".to_string()).is_server_error());
        assert_eq!(
            AppError::Database("closed".to_string()).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: AppError = config::ConfigError::NotFound("database.url".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
