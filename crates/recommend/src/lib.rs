//! BookStar Hybrid Recommendation Engine
//!
//! Blends two signal sources into one ranked list of books per member:
//! the member's own declared reading history (content-based scoring over
//! category and author preferences) and the reading behavior of similar
//! members (collaborative scoring over a nearest-neighbor search).
//!
//! Pipeline, leaf-first:
//!
//! - [`preferences`]: weighted category/author preference extraction
//! - [`similarity`]: k-nearest-neighbor search over the member-book
//!   incidence matrix
//! - [`content`]: preference-weighted catalog ranking
//! - [`collaborative`]: peer-touched candidate lookup
//! - [`recommendation`]: merge, dedup, truncate, random fallback
//! - [`cache`]: process-lifetime memoization of derived artifacts
//! - [`store`]: the read-only storage seam ([`store::BookStore`])
//! - [`http`]: the service's HTTP surface

pub mod cache;
pub mod collaborative;
pub mod content;
pub mod http;
pub mod preferences;
pub mod recommendation;
pub mod similarity;
pub mod store;
pub mod types;

// Re-export key types
pub use cache::EngineCache;
pub use collaborative::CollaborativeScorer;
pub use content::ContentScorer;
pub use preferences::PreferenceExtractor;
pub use recommendation::RecommendationService;
pub use similarity::PeerFinder;
pub use store::{BookStore, PgBookStore};
pub use types::{
    Candidate, PreferenceScores, ReadingLists, RecommendationSource, RecommendedBook,
    ScorerOutcome,
};

#[cfg(test)]
mod tests;
