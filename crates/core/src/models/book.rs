//! Book catalog models
//!
//! Catalog rows are read-only to every BookStar service; the recommendation
//! engine joins against them by `book_id`, the stable catalog identifier.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Book category, drawn from the fixed catalog taxonomy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "book_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookCategory {
    Art,
    Children,
    Comics,
    Cooking,
    Economics,
    Education,
    Essay,
    Health,
    History,
    Literature,
    Music,
    Novel,
    Other,
    Philosophy,
    Poetry,
    Politics,
    Religion,
    Science,
    SelfHelp,
    Technology,
    Travel,
}

/// Catalog row consumed by the recommendation engine
///
/// A projection of the `book` table carrying exactly the columns the
/// scoring pipeline and the API response need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookSummary {
    /// Stable catalog identifier (the join key across all components)
    pub book_id: i64,

    /// Book title
    #[validate(length(max = 255))]
    pub title: Option<String>,

    /// Author name
    #[validate(length(max = 255))]
    pub author: Option<String>,

    /// Catalog category
    pub category: Option<BookCategory>,

    /// Cover image URL
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Preference-relevant book attributes
///
/// The minimal projection fetched in one batch when deriving a member's
/// preference scores.
#[derive(Debug, Clone, PartialEq)]
pub struct BookMetadata {
    pub book_id: i64,
    pub category: Option<BookCategory>,
    pub author: Option<String>,
}
