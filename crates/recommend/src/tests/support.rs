//! In-memory storage double with call counting
//!
//! Backs every engine test: a fixed catalog plus member-book relations,
//! answering the [`BookStore`] surface the way the SQL implementation
//! would (catalog order preserved, batched lookups, distinct peer books).
//! Per-method call counters support cache idempotency assertions, and
//! failure switches simulate storage outages.

use crate::store::BookStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bookstar_core::models::book::{BookCategory, BookMetadata, BookSummary};
use bookstar_core::models::member::{MemberBookRecord, ReadingStatus};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn book(
    book_id: i64,
    title: &str,
    author: Option<&str>,
    category: Option<BookCategory>,
) -> BookSummary {
    BookSummary {
        book_id,
        title: Some(title.to_string()),
        author: author.map(str::to_string),
        category,
        image_url: None,
    }
}

#[derive(Default)]
pub struct CallCounts {
    pub member_relations: AtomicUsize,
    pub book_metadata: AtomicUsize,
    pub catalog_excluding: AtomicUsize,
    pub books_by_ids: AtomicUsize,
    pub all_member_books: AtomicUsize,
    pub member_book_ids: AtomicUsize,
}

#[derive(Default)]
pub struct MockStore {
    catalog: Vec<BookSummary>,
    relations: Vec<(i64, i64, ReadingStatus)>,
    pub calls: CallCounts,
    fail_member_relations: AtomicBool,
    fail_catalog: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, book: BookSummary) -> Self {
        self.catalog.push(book);
        self
    }

    pub fn with_relation(mut self, member_id: i64, book_id: i64, status: ReadingStatus) -> Self {
        self.relations.push((member_id, book_id, status));
        self
    }

    /// Make `member_relations` fail until reset
    pub fn failing_member_relations(self) -> Self {
        self.fail_member_relations.store(true, Ordering::SeqCst);
        self
    }

    /// Make catalog queries fail until reset
    pub fn failing_catalog(self) -> Self {
        self.fail_catalog.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl BookStore for MockStore {
    async fn member_relations(&self, member_id: i64) -> Result<Vec<MemberBookRecord>> {
        self.calls.member_relations.fetch_add(1, Ordering::SeqCst);
        if self.fail_member_relations.load(Ordering::SeqCst) {
            return Err(anyhow!("storage offline"));
        }

        Ok(self
            .relations
            .iter()
            .filter(|(mid, _, _)| *mid == member_id)
            .map(|&(_, book_id, status)| MemberBookRecord { book_id, status })
            .collect())
    }

    async fn book_metadata(&self, book_ids: &[i64]) -> Result<Vec<BookMetadata>> {
        self.calls.book_metadata.fetch_add(1, Ordering::SeqCst);

        let wanted: HashSet<i64> = book_ids.iter().copied().collect();
        Ok(self
            .catalog
            .iter()
            .filter(|b| wanted.contains(&b.book_id))
            .map(|b| BookMetadata {
                book_id: b.book_id,
                category: b.category,
                author: b.author.clone(),
            })
            .collect())
    }

    async fn catalog_excluding(&self, exclude: &[i64]) -> Result<Vec<BookSummary>> {
        self.calls.catalog_excluding.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(anyhow!("storage offline"));
        }

        let excluded: HashSet<i64> = exclude.iter().copied().collect();
        Ok(self
            .catalog
            .iter()
            .filter(|b| !excluded.contains(&b.book_id))
            .cloned()
            .collect())
    }

    async fn books_by_ids(&self, book_ids: &[i64], limit: usize) -> Result<Vec<BookSummary>> {
        self.calls.books_by_ids.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(anyhow!("storage offline"));
        }

        let wanted: HashSet<i64> = book_ids.iter().copied().collect();
        Ok(self
            .catalog
            .iter()
            .filter(|b| wanted.contains(&b.book_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn all_member_books(&self) -> Result<Vec<(i64, i64)>> {
        self.calls.all_member_books.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .relations
            .iter()
            .map(|&(member_id, book_id, _)| (member_id, book_id))
            .collect())
    }

    async fn member_book_ids(&self, member_ids: &[i64]) -> Result<Vec<i64>> {
        self.calls.member_book_ids.fetch_add(1, Ordering::SeqCst);

        let members: HashSet<i64> = member_ids.iter().copied().collect();
        let mut seen = HashSet::new();
        Ok(self
            .relations
            .iter()
            .filter(|(mid, _, _)| members.contains(mid))
            .map(|&(_, book_id, _)| book_id)
            .filter(|id| seen.insert(*id))
            .collect())
    }
}
