//! Error types shared across BookStar services
//!
//! All plumbing layers (configuration, database, HTTP) speak
//! [`BookstarError`]; engine internals that downgrade failures instead of
//! typing them use `anyhow` locally and never let errors escape their
//! component boundary.

use thiserror::Error;

/// Unified error type for BookStar operations
#[derive(Debug, Error)]
pub enum BookstarError {
    /// Database query or connection failure
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Invalid or missing configuration
    #[error("configuration error: {message}")]
    ConfigurationError {
        message: String,
        /// The environment variable or config key at fault, when known
        key: Option<String>,
    },

    /// Request payload failed validation
    #[error("validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    /// A referenced entity does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },
}

impl BookstarError {
    /// Whether the operation that produced this error is worth retrying.
    ///
    /// Only transient database conditions (I/O failures, pool exhaustion)
    /// qualify; configuration and validation errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookstarError::DatabaseError(err) => matches!(
                err,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = BookstarError::ConfigurationError {
            message: "DATABASE_URL must be set".to_string(),
            key: Some("BOOKSTAR_DATABASE_URL".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: DATABASE_URL must be set"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = BookstarError::NotFound {
            resource: "member".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "member not found: 42");
    }

    #[test]
    fn test_validation_error_not_retryable() {
        let err = BookstarError::ValidationError {
            message: "num_recommendations must be positive".to_string(),
            field: Some("num_recommendations".to_string()),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_pool_timeout_is_retryable() {
        let err = BookstarError::DatabaseError(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
    }
}
