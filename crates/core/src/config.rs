//! Shared configuration loader module for BookStar services
//!
//! Provides a unified configuration loading system with environment variable
//! parsing, validation, and support for .env files. All configuration uses
//! the `BOOKSTAR_` prefix for environment variables.
//!
//! # Features
//!
//! - Environment variable parsing with typed values
//! - .env file support via dotenvy
//! - Configuration validation with clear error messages
//! - Default values for optional fields
//! - Configuration override hierarchy: defaults < .env < environment
//!
//! # Example
//!
//! ```no_run
//! use bookstar_core::config::{ConfigLoader, DatabaseConfig, RecommendationConfig, ServiceConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load .env file (optional)
//! dotenvy::dotenv().ok();
//!
//! let db_config = DatabaseConfig::from_env()?;
//! let service_config = ServiceConfig::from_env()?;
//! let recommendation_config = RecommendationConfig::from_env()?;
//!
//! db_config.validate()?;
//! service_config.validate()?;
//! recommendation_config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::BookstarError;
use std::time::Duration;
use url::Url;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration
/// from environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// Reads environment variables with the `BOOKSTAR_` prefix and
    /// constructs a configuration instance with defaults for missing
    /// optional values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if required environment variables are
    /// missing or values cannot be parsed.
    fn from_env() -> Result<Self, BookstarError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), BookstarError>;
}

/// Database configuration
///
/// Configuration for PostgreSQL connections with pooling settings.
///
/// # Environment Variables
///
/// - `BOOKSTAR_DATABASE_URL` (required, falls back to `DATABASE_URL`)
/// - `BOOKSTAR_DATABASE_MAX_CONNECTIONS` (optional, default: 20)
/// - `BOOKSTAR_DATABASE_MIN_CONNECTIONS` (optional, default: 2)
/// - `BOOKSTAR_DATABASE_CONNECT_TIMEOUT` (optional, seconds, default: 30)
/// - `BOOKSTAR_DATABASE_IDLE_TIMEOUT` (optional, seconds, default: 600)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle connection timeout duration
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/bookstar".to_string(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl ConfigLoader for DatabaseConfig {
    fn from_env() -> Result<Self, BookstarError> {
        let url = std::env::var("BOOKSTAR_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| BookstarError::ConfigurationError {
                message: "DATABASE_URL or BOOKSTAR_DATABASE_URL must be set".to_string(),
                key: Some("BOOKSTAR_DATABASE_URL".to_string()),
            })?;

        let max_connections = parse_env_var(
            "BOOKSTAR_DATABASE_MAX_CONNECTIONS",
            DatabaseConfig::default().max_connections,
        )?;

        let min_connections = parse_env_var(
            "BOOKSTAR_DATABASE_MIN_CONNECTIONS",
            DatabaseConfig::default().min_connections,
        )?;

        let connect_timeout_secs = parse_env_var("BOOKSTAR_DATABASE_CONNECT_TIMEOUT", 30u64)?;
        let idle_timeout_secs = parse_env_var("BOOKSTAR_DATABASE_IDLE_TIMEOUT", 600u64)?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
        })
    }

    fn validate(&self) -> Result<(), BookstarError> {
        Url::parse(&self.url).map_err(|e| BookstarError::ConfigurationError {
            message: format!("Invalid DATABASE_URL: {}", e),
            key: Some("BOOKSTAR_DATABASE_URL".to_string()),
        })?;

        if self.max_connections == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "max_connections must be greater than 0".to_string(),
                key: Some("BOOKSTAR_DATABASE_MAX_CONNECTIONS".to_string()),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(BookstarError::ConfigurationError {
                message: format!(
                    "min_connections ({}) cannot exceed max_connections ({})",
                    self.min_connections, self.max_connections
                ),
                key: Some("BOOKSTAR_DATABASE_MIN_CONNECTIONS".to_string()),
            });
        }

        if self.connect_timeout.as_secs() == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "connect_timeout must be greater than 0 seconds".to_string(),
                key: Some("BOOKSTAR_DATABASE_CONNECT_TIMEOUT".to_string()),
            });
        }

        if self.idle_timeout.as_secs() == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "idle_timeout must be greater than 0 seconds".to_string(),
                key: Some("BOOKSTAR_DATABASE_IDLE_TIMEOUT".to_string()),
            });
        }

        Ok(())
    }
}

/// Service configuration
///
/// Configuration for HTTP service settings.
///
/// # Environment Variables
///
/// - `BOOKSTAR_SERVICE_HOST` (optional, default: "0.0.0.0")
/// - `BOOKSTAR_SERVICE_PORT` (optional, default: 8084, falls back to `PORT`)
/// - `BOOKSTAR_SERVICE_WORKERS` (optional, default: CPU count)
/// - `BOOKSTAR_SERVICE_LOG_LEVEL` (optional, default: "info", falls back to `RUST_LOG`)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8084,
            workers: num_cpus::get(),
            log_level: "info".to_string(),
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, BookstarError> {
        let host = std::env::var("BOOKSTAR_SERVICE_HOST")
            .unwrap_or_else(|_| ServiceConfig::default().host);

        let port = parse_env_var("BOOKSTAR_SERVICE_PORT", ServiceConfig::default().port)
            .or_else(|_| parse_env_var("PORT", ServiceConfig::default().port))?;

        let workers = parse_env_var("BOOKSTAR_SERVICE_WORKERS", ServiceConfig::default().workers)?;

        let log_level = std::env::var("BOOKSTAR_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| ServiceConfig::default().log_level);

        Ok(Self {
            host,
            port,
            workers,
            log_level,
        })
    }

    fn validate(&self) -> Result<(), BookstarError> {
        if self.port == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "port must be greater than 0".to_string(),
                key: Some("BOOKSTAR_SERVICE_PORT".to_string()),
            });
        }

        if self.workers == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "workers must be greater than 0".to_string(),
                key: Some("BOOKSTAR_SERVICE_WORKERS".to_string()),
            });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(BookstarError::ConfigurationError {
                message: format!(
                    "Invalid log_level '{}'. Must be one of: {}",
                    self.log_level,
                    valid_log_levels.join(", ")
                ),
                key: Some("BOOKSTAR_SERVICE_LOG_LEVEL".to_string()),
            });
        }

        Ok(())
    }
}

/// Recommendation engine configuration
///
/// The weighting scheme and counts consumed by the recommendation engine.
/// The engine treats every value here as an injected parameter; nothing in
/// the scoring pipeline hard-codes these numbers.
///
/// # Environment Variables
///
/// - `BOOKSTAR_RECOMMENDATION_READ_BOOK_WEIGHT` (optional, default: 0.7)
/// - `BOOKSTAR_RECOMMENDATION_UNREAD_BOOK_WEIGHT` (optional, default: 1.0)
/// - `BOOKSTAR_RECOMMENDATION_CATEGORY_PREFERENCE_WEIGHT` (optional, default: 2.0)
/// - `BOOKSTAR_RECOMMENDATION_AUTHOR_PREFERENCE_WEIGHT` (optional, default: 1.5)
/// - `BOOKSTAR_RECOMMENDATION_DEFAULT_RECOMMENDATIONS_COUNT` (optional, default: 10)
/// - `BOOKSTAR_RECOMMENDATION_SIMILAR_USERS_COUNT` (optional, default: 5)
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// Per-item weight for books the member has read or is reading
    pub read_book_weight: f64,
    /// Per-item weight for books the member wants to read
    pub unread_book_weight: f64,
    /// Multiplier applied to category preference accumulation
    pub category_preference_weight: f64,
    /// Multiplier applied to author preference accumulation
    pub author_preference_weight: f64,
    /// Number of recommendations returned when the caller does not specify one
    pub default_recommendations_count: usize,
    /// Number of nearest neighbors consulted by collaborative filtering
    pub similar_users_count: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            read_book_weight: 0.7,
            unread_book_weight: 1.0,
            category_preference_weight: 2.0,
            author_preference_weight: 1.5,
            default_recommendations_count: 10,
            similar_users_count: 5,
        }
    }
}

impl ConfigLoader for RecommendationConfig {
    fn from_env() -> Result<Self, BookstarError> {
        let defaults = RecommendationConfig::default();

        Ok(Self {
            read_book_weight: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_READ_BOOK_WEIGHT",
                defaults.read_book_weight,
            )?,
            unread_book_weight: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_UNREAD_BOOK_WEIGHT",
                defaults.unread_book_weight,
            )?,
            category_preference_weight: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_CATEGORY_PREFERENCE_WEIGHT",
                defaults.category_preference_weight,
            )?,
            author_preference_weight: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_AUTHOR_PREFERENCE_WEIGHT",
                defaults.author_preference_weight,
            )?,
            default_recommendations_count: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_DEFAULT_RECOMMENDATIONS_COUNT",
                defaults.default_recommendations_count,
            )?,
            similar_users_count: parse_env_var(
                "BOOKSTAR_RECOMMENDATION_SIMILAR_USERS_COUNT",
                defaults.similar_users_count,
            )?,
        })
    }

    fn validate(&self) -> Result<(), BookstarError> {
        let weights = [
            ("BOOKSTAR_RECOMMENDATION_READ_BOOK_WEIGHT", self.read_book_weight),
            (
                "BOOKSTAR_RECOMMENDATION_UNREAD_BOOK_WEIGHT",
                self.unread_book_weight,
            ),
            (
                "BOOKSTAR_RECOMMENDATION_CATEGORY_PREFERENCE_WEIGHT",
                self.category_preference_weight,
            ),
            (
                "BOOKSTAR_RECOMMENDATION_AUTHOR_PREFERENCE_WEIGHT",
                self.author_preference_weight,
            ),
        ];

        for (key, value) in weights {
            if !value.is_finite() || value <= 0.0 {
                return Err(BookstarError::ConfigurationError {
                    message: format!("{} must be a positive number, got {}", key, value),
                    key: Some(key.to_string()),
                });
            }
        }

        if self.default_recommendations_count == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "default_recommendations_count must be greater than 0".to_string(),
                key: Some("BOOKSTAR_RECOMMENDATION_DEFAULT_RECOMMENDATIONS_COUNT".to_string()),
            });
        }

        if self.similar_users_count == 0 {
            return Err(BookstarError::ConfigurationError {
                message: "similar_users_count must be greater than 0".to_string(),
                key: Some("BOOKSTAR_RECOMMENDATION_SIMILAR_USERS_COUNT".to_string()),
            });
        }

        Ok(())
    }
}

/// Helper function to parse an environment variable with a default value
///
/// # Errors
///
/// Returns a `ConfigurationError` if the value is present but cannot be
/// parsed into `T`.
fn parse_env_var<T>(key: &str, default: T) -> Result<T, BookstarError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>().map_err(|e| BookstarError::ConfigurationError {
                message: format!("Failed to parse {}: {}", key, e),
                key: Some(key.to_string()),
            })
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
///
/// Convenience wrapper around dotenvy that stays silent when no .env file
/// exists.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests that touch process-wide environment variables are serialized.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_database_config_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("BOOKSTAR_DATABASE_URL", "postgresql://localhost/test");
        env::set_var("BOOKSTAR_DATABASE_MAX_CONNECTIONS", "50");

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.url, "postgresql://localhost/test");
        assert_eq!(config.max_connections, 50);

        env::remove_var("BOOKSTAR_DATABASE_URL");
        env::remove_var("BOOKSTAR_DATABASE_MAX_CONNECTIONS");
    }

    #[test]
    fn test_database_url_fallback() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("DATABASE_URL", "postgresql://fallback/test");

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.url, "postgresql://fallback/test");

        env::remove_var("DATABASE_URL");
    }

    #[test]
    fn test_database_config_validation_invalid_url() {
        let config = DatabaseConfig {
            url: "not-a-valid-url".to_string(),
            ..DatabaseConfig::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            BookstarError::ConfigurationError { .. }
        ));
    }

    #[test]
    fn test_database_config_validation_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            min_connections: 30,
            max_connections: 20,
            ..DatabaseConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8084);
        assert_eq!(config.log_level, "info");
        assert!(config.workers > 0);
    }

    #[test]
    fn test_service_config_validation_invalid_log_level() {
        let config = ServiceConfig {
            log_level: "loud".to_string(),
            ..ServiceConfig::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            BookstarError::ConfigurationError { message, .. } => {
                assert!(message.contains("Invalid log_level"));
            }
            _ => panic!("Expected ConfigurationError"),
        }
    }

    #[test]
    fn test_service_config_validation_zero_port() {
        let config = ServiceConfig {
            port: 0,
            ..ServiceConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recommendation_config_default() {
        let config = RecommendationConfig::default();
        assert_eq!(config.read_book_weight, 0.7);
        assert_eq!(config.unread_book_weight, 1.0);
        assert_eq!(config.category_preference_weight, 2.0);
        assert_eq!(config.author_preference_weight, 1.5);
        assert_eq!(config.default_recommendations_count, 10);
        assert_eq!(config.similar_users_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_recommendation_config_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("BOOKSTAR_RECOMMENDATION_READ_BOOK_WEIGHT", "0.5");
        env::set_var("BOOKSTAR_RECOMMENDATION_SIMILAR_USERS_COUNT", "3");

        let config = RecommendationConfig::from_env().unwrap();
        assert_eq!(config.read_book_weight, 0.5);
        assert_eq!(config.similar_users_count, 3);
        // Untouched values keep their defaults
        assert_eq!(config.unread_book_weight, 1.0);

        env::remove_var("BOOKSTAR_RECOMMENDATION_READ_BOOK_WEIGHT");
        env::remove_var("BOOKSTAR_RECOMMENDATION_SIMILAR_USERS_COUNT");
    }

    #[test]
    fn test_recommendation_config_rejects_negative_weight() {
        let config = RecommendationConfig {
            category_preference_weight: -2.0,
            ..RecommendationConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recommendation_config_rejects_zero_count() {
        let config = RecommendationConfig {
            default_recommendations_count: 0,
            ..RecommendationConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_var_with_default() {
        let result: u32 = parse_env_var("BOOKSTAR_TEST_ABSENT_VAR", 42).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_env_var_invalid_value() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("BOOKSTAR_TEST_INVALID_VAR", "not-a-number");
        let result: Result<u32, _> = parse_env_var("BOOKSTAR_TEST_INVALID_VAR", 42);
        assert!(result.is_err());
        env::remove_var("BOOKSTAR_TEST_INVALID_VAR");
    }
}
