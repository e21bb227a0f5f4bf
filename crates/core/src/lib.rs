//! # BookStar Core
//!
//! Core data structures and shared plumbing for the BookStar platform.
//!
//! This crate provides the building blocks used by every BookStar service:
//! domain models for books and members, configuration loading, error
//! handling, the shared PostgreSQL connection pool, structured logging,
//! retry utilities and vector math helpers.
//!
//! ## Modules
//!
//! - `models`: Domain models for books, members and reading records
//! - `error`: Error types and handling
//! - `config`: Configuration loading and validation
//! - `database`: Shared PostgreSQL connection pool
//! - `math`: Mathematical utilities for vector operations
//! - `observability`: Structured logging initialization
//! - `retry`: Exponential backoff retry utilities

pub mod config;
pub mod database;
pub mod error;
pub mod math;
pub mod models;
pub mod observability;
pub mod retry;

// Re-export commonly used types
pub use config::{load_dotenv, ConfigLoader, DatabaseConfig, RecommendationConfig, ServiceConfig};
pub use database::{DatabasePool, PoolStats};
pub use error::BookstarError;
pub use math::{cosine_similarity, dot_product, l2_distance, normalize_vector};
pub use models::book::{BookCategory, BookMetadata, BookSummary};
pub use models::member::{MemberBookRecord, ReadingStatus};
pub use observability::{init_logging, LogConfig, LogFormat};
pub use retry::{retry_with_backoff, RetryPolicy};

/// Result type alias for BookStar operations
pub type Result<T> = std::result::Result<T, BookstarError>;
