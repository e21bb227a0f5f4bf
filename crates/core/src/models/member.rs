//! Member reading-record models

use serde::{Deserialize, Serialize};

/// Reading status of a member-book relation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "reading_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    HaveRead,
    CurrentlyReading,
    WantToRead,
}

impl ReadingStatus {
    /// Whether this status counts toward the member's read list.
    ///
    /// Books currently being read are treated as read signal; only
    /// want-to-read entries form the want list.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            ReadingStatus::HaveRead | ReadingStatus::CurrentlyReading
        )
    }
}

/// One member-book relation as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberBookRecord {
    pub book_id: i64,
    pub status: ReadingStatus,
}
