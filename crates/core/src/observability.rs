//! Structured logging initialization for BookStar services
//!
//! Every service initializes logging once at startup through
//! [`init_logging`]. Output format defaults to JSON for production;
//! pretty-printed output is available for local development via
//! `BOOKSTAR_LOG_FORMAT=pretty`.

use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for log aggregation
    Json,
    /// Human-readable output for local development
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "bookstar_recommend=debug,info"
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LogConfig {
    /// Build a logging configuration from a service log level, honoring the
    /// `BOOKSTAR_LOG_FORMAT` environment variable for the output format.
    pub fn from_level(level: &str) -> Self {
        let format = match std::env::var("BOOKSTAR_LOG_FORMAT").as_deref() {
            Ok("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };
        Self {
            level: level.to_string(),
            format,
        }
    }
}

/// Initialize the global tracing subscriber
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(config: &LogConfig) {
    let filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("logging already initialized, keeping existing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
        };
        init_logging(&config);
        // A second call must not panic
        init_logging(&config);
    }
}
