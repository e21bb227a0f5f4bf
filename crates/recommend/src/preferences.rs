//! Preference extraction
//!
//! Turns a member's raw reading records into weighted category and author
//! preference scores. Both the reading lists and the derived scores are
//! memoized in the engine cache, so storage is consulted once per member id
//! for the lifetime of the process.

use crate::cache::EngineCache;
use crate::store::BookStore;
use crate::types::{PreferenceScores, ReadingLists};
use anyhow::Result;
use bookstar_core::config::RecommendationConfig;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Derives per-member preference signals from reading records
#[derive(Clone)]
pub struct PreferenceExtractor {
    store: Arc<dyn BookStore>,
    cache: Arc<EngineCache>,
    config: RecommendationConfig,
}

impl PreferenceExtractor {
    pub fn new(
        store: Arc<dyn BookStore>,
        cache: Arc<EngineCache>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// The member's reading lists, partitioned by status
    ///
    /// Issues at most one storage query per member id per process lifetime.
    /// A member unknown to storage yields empty lists, not an error.
    pub async fn reading_lists(&self, member_id: i64) -> Result<Arc<ReadingLists>> {
        if let Some(hit) = self.cache.reading_lists(member_id) {
            debug!(member_id, "reading lists served from cache");
            return Ok(hit);
        }

        let relations = self.store.member_relations(member_id).await?;

        let mut lists = ReadingLists::default();
        for record in relations {
            if record.status.is_read() {
                lists.read.push(record.book_id);
            } else {
                lists.want.push(record.book_id);
            }
        }

        let lists = Arc::new(lists);
        self.cache.store_reading_lists(member_id, lists.clone());

        info!(
            member_id,
            read_count = lists.read.len(),
            want_count = lists.want.len(),
            "loaded reading lists"
        );

        Ok(lists)
    }

    /// The member's accumulated category and author preference scores
    ///
    /// Returns `None` for a member with no reading history. Category and
    /// author lookups for the whole history happen in a single batched
    /// query; books with missing metadata contribute nothing.
    pub async fn preferences(&self, member_id: i64) -> Result<Option<Arc<PreferenceScores>>> {
        if let Some(hit) = self.cache.preferences(member_id) {
            debug!(member_id, "preferences served from cache");
            return Ok(Some(hit));
        }

        let lists = self.reading_lists(member_id).await?;
        if lists.is_empty() {
            return Ok(None);
        }

        let book_ids = lists.all_ids();
        let metadata = self.store.book_metadata(&book_ids).await?;

        let read_set: HashSet<i64> = lists.read.iter().copied().collect();
        let mut categories = HashMap::new();
        let mut authors = HashMap::new();

        for book in metadata {
            let item_weight = if read_set.contains(&book.book_id) {
                self.config.read_book_weight
            } else {
                self.config.unread_book_weight
            };

            if let Some(category) = book.category {
                *categories.entry(category).or_insert(0.0) +=
                    self.config.category_preference_weight * item_weight;
            }
            if let Some(author) = book.author {
                *authors.entry(author).or_insert(0.0) +=
                    self.config.author_preference_weight * item_weight;
            }
        }

        let scores = Arc::new(PreferenceScores {
            categories,
            authors,
        });
        self.cache.store_preferences(member_id, scores.clone());

        info!(
            member_id,
            category_count = scores.categories.len(),
            author_count = scores.authors.len(),
            "derived preference scores"
        );

        Ok(Some(scores))
    }
}
