//! Storage collaborator for the recommendation engine
//!
//! The engine depends on the [`BookStore`] trait, never on a concrete
//! database. Every method is a read; the engine never mutates persistent
//! state. [`PgBookStore`] is the production implementation over the shared
//! PostgreSQL pool.

use anyhow::Result;
use async_trait::async_trait;
use bookstar_core::models::book::{BookCategory, BookMetadata, BookSummary};
use bookstar_core::models::member::{MemberBookRecord, ReadingStatus};
use sqlx::{PgPool, Row};

/// Read-only storage surface consumed by the engine
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All of one member's book relations with their reading status
    async fn member_relations(&self, member_id: i64) -> Result<Vec<MemberBookRecord>>;

    /// Category and author for every given book id, in one batched query
    async fn book_metadata(&self, book_ids: &[i64]) -> Result<Vec<BookMetadata>>;

    /// The full catalog minus the given book ids
    async fn catalog_excluding(&self, exclude: &[i64]) -> Result<Vec<BookSummary>>;

    /// Catalog rows for the given ids, capped at `limit`, in storage order
    async fn books_by_ids(&self, book_ids: &[i64], limit: usize) -> Result<Vec<BookSummary>>;

    /// Every (member_id, book_id) relation in the system
    async fn all_member_books(&self) -> Result<Vec<(i64, i64)>>;

    /// Distinct book ids any of the given members has a relation to
    async fn member_book_ids(&self, member_ids: &[i64]) -> Result<Vec<i64>>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn summary_from_row(row: &sqlx::postgres::PgRow) -> Result<BookSummary> {
        Ok(BookSummary {
            book_id: row.try_get("catalog_book_id")?,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            category: row.try_get("category")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn member_relations(&self, member_id: i64) -> Result<Vec<MemberBookRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT book_id, reading_status
            FROM member_book
            WHERE member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        let mut relations = Vec::with_capacity(rows.len());
        for row in rows {
            let book_id: i64 = row.try_get("book_id")?;
            let status: ReadingStatus = row.try_get("reading_status")?;
            relations.push(MemberBookRecord { book_id, status });
        }

        Ok(relations)
    }

    async fn book_metadata(&self, book_ids: &[i64]) -> Result<Vec<BookMetadata>> {
        let rows = sqlx::query(
            r#"
            SELECT catalog_book_id, category, author
            FROM book
            WHERE catalog_book_id = ANY($1)
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut metadata = Vec::with_capacity(rows.len());
        for row in rows {
            let book_id: i64 = row.try_get("catalog_book_id")?;
            let category: Option<BookCategory> = row.try_get("category")?;
            let author: Option<String> = row.try_get("author")?;
            metadata.push(BookMetadata {
                book_id,
                category,
                author,
            });
        }

        Ok(metadata)
    }

    async fn catalog_excluding(&self, exclude: &[i64]) -> Result<Vec<BookSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT catalog_book_id, title, author, category, image_url
            FROM book
            WHERE catalog_book_id <> ALL($1)
            "#,
        )
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::summary_from_row).collect()
    }

    async fn books_by_ids(&self, book_ids: &[i64], limit: usize) -> Result<Vec<BookSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT catalog_book_id, title, author, category, image_url
            FROM book
            WHERE catalog_book_id = ANY($1)
            LIMIT $2
            "#,
        )
        .bind(book_ids)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::summary_from_row).collect()
    }

    async fn all_member_books(&self) -> Result<Vec<(i64, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT mb.member_id, mb.book_id
            FROM member_book mb
            JOIN member m ON m.id = mb.member_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut relations = Vec::with_capacity(rows.len());
        for row in rows {
            let member_id: i64 = row.try_get("member_id")?;
            let book_id: i64 = row.try_get("book_id")?;
            relations.push((member_id, book_id));
        }

        Ok(relations)
    }

    async fn member_book_ids(&self, member_ids: &[i64]) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT book_id
            FROM member_book
            WHERE member_id = ANY($1)
            "#,
        )
        .bind(member_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get::<i64, _>("book_id")?);
        }

        Ok(ids)
    }
}
