//! Engine-owned derived types
//!
//! Every query result the engine works with is a strongly typed row; the
//! tagged [`ScorerOutcome`] replaces emptiness-as-signal so the combiner
//! can pattern-match on what each scorer actually produced.

use bookstar_core::models::book::{BookCategory, BookSummary};
use serde::Serialize;
use std::collections::HashMap;

/// A member's reading history, partitioned by status
///
/// `read` holds books with status HAVE_READ or CURRENTLY_READING, `want`
/// holds WANT_TO_READ entries. The partitions come from disjoint status
/// values; the engine does not deduplicate across them if the source data
/// is inconsistent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingLists {
    pub read: Vec<i64>,
    pub want: Vec<i64>,
}

impl ReadingLists {
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.want.is_empty()
    }

    /// All book ids the member has any relation to, read list first
    pub fn all_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(self.read.len() + self.want.len());
        ids.extend_from_slice(&self.read);
        ids.extend_from_slice(&self.want);
        ids
    }
}

/// Accumulated category and author preference weights for one member
///
/// Built by summing, over every book in the member's reading lists, the
/// per-item weight (read vs want) times the per-dimension multiplier.
/// A member with no reading history has no `PreferenceScores` at all
/// (`None` at the extractor), never zeroed maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceScores {
    pub categories: HashMap<BookCategory, f64>,
    pub authors: HashMap<String, f64>,
}

/// Which pipeline produced a candidate row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Content,
    Collaborative,
    Random,
}

/// One ranked candidate row produced by a scorer
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub book: BookSummary,
    /// Content scoring weight; collaborative candidates carry 0.0 since the
    /// collaborative path returns peer-touched membership, not an
    /// agreement-strength score
    pub weight: f64,
    pub source: RecommendationSource,
}

/// Tagged result of one scorer run
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerOutcome {
    /// The scorer produced a non-empty ranked candidate table
    Scored(Vec<Candidate>),
    /// No signal for this member (not an error)
    Empty,
    /// The scorer failed internally; already logged at its boundary
    Failed(String),
}

/// One row of the final recommendation response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedBook {
    pub book_id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<BookCategory>,
    pub image_url: Option<String>,
}

impl From<Candidate> for RecommendedBook {
    fn from(candidate: Candidate) -> Self {
        let book = candidate.book;
        Self {
            book_id: book.book_id,
            title: book.title,
            author: book.author,
            category: book.category,
            image_url: book.image_url,
        }
    }
}
