//! Hybrid recommendation combiner
//!
//! Merges the content-based and collaborative candidate tables under a
//! dedup-by-book-id policy, truncates to the requested count, and converts
//! any pipeline failure into the random fallback. `recommend` is
//! infallible to its caller: it always returns a list, possibly shorter
//! than requested when the catalog itself is smaller.

use crate::cache::EngineCache;
use crate::collaborative::CollaborativeScorer;
use crate::content::{random_candidates, ContentScorer};
use crate::preferences::PreferenceExtractor;
use crate::similarity::PeerFinder;
use crate::store::BookStore;
use crate::types::{Candidate, RecommendedBook, ScorerOutcome};
use anyhow::Result;
use bookstar_core::config::RecommendationConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

/// Hybrid recommendation engine
///
/// One instance is shared across request workers; the embedded
/// [`EngineCache`] is the only shared mutable state.
pub struct RecommendationService {
    store: Arc<dyn BookStore>,
    cache: Arc<EngineCache>,
    config: RecommendationConfig,
    content: ContentScorer,
    collaborative: CollaborativeScorer,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn BookStore>, config: RecommendationConfig) -> Self {
        let cache = Arc::new(EngineCache::new());
        let extractor = PreferenceExtractor::new(store.clone(), cache.clone(), config.clone());
        let peers = PeerFinder::new(store.clone(), cache.clone());

        let content = ContentScorer::new(store.clone(), extractor.clone());
        let collaborative =
            CollaborativeScorer::new(store.clone(), extractor, peers, config.clone());

        Self {
            store,
            cache,
            config,
            content,
            collaborative,
        }
    }

    /// The engine's derived-data cache, exposed for reset and inspection
    pub fn cache(&self) -> &EngineCache {
        &self.cache
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Recommend up to `n` books for a member
    ///
    /// `read_list` and `want_list` are the caller's precomputed view of the
    /// member's history and are used for request logging; the scorers
    /// re-derive them through the cache. `num_recommendations` falls back
    /// to the configured default.
    ///
    /// This entry point never fails: any error inside the pipeline is
    /// logged and converted into uniform catalog sampling, and a failing
    /// fallback yields an empty list.
    pub async fn recommend(
        &self,
        member_id: i64,
        read_list: &[i64],
        want_list: &[i64],
        num_recommendations: Option<usize>,
    ) -> Vec<RecommendedBook> {
        let n = num_recommendations.unwrap_or(self.config.default_recommendations_count);

        info!(
            member_id,
            read_count = read_list.len(),
            want_count = want_list.len(),
            n,
            "hybrid recommendation started"
        );

        match self.try_recommend(member_id, n).await {
            Ok(rows) => {
                info!(member_id, count = rows.len(), "recommendation complete");
                rows
            }
            Err(e) => {
                error!(
                    member_id,
                    error = %e,
                    "recommendation pipeline failed, falling back to random sampling"
                );
                match random_candidates(self.store.as_ref(), n).await {
                    Ok(sampled) => sampled.into_iter().map(RecommendedBook::from).collect(),
                    Err(e) => {
                        error!(member_id, error = %e, "random fallback failed");
                        Vec::new()
                    }
                }
            }
        }
    }

    async fn try_recommend(&self, member_id: i64, n: usize) -> Result<Vec<RecommendedBook>> {
        let content = self.content.score(member_id, n).await;
        // Collaborative candidates fill at most half the requested count
        let collaborative = self.collaborative.score(member_id, n / 2).await;

        let combined = match (content, collaborative) {
            (ScorerOutcome::Scored(content_rows), ScorerOutcome::Scored(collaborative_rows)) => {
                // Content rows come first so they win dedup ties
                let mut rows: Vec<Candidate> = content_rows.into_iter().take(n / 2).collect();
                rows.extend(collaborative_rows);
                dedup_by_book_id(rows)
            }
            (ScorerOutcome::Scored(content_rows), _) => content_rows,
            (_, ScorerOutcome::Scored(collaborative_rows)) => collaborative_rows,
            _ => {
                info!(member_id, "no personalized signal, sampling the catalog");
                random_candidates(self.store.as_ref(), n).await?
            }
        };

        Ok(combined
            .into_iter()
            .take(n)
            .map(RecommendedBook::from)
            .collect())
    }
}

/// Drop rows with a book id already seen; first occurrence wins
fn dedup_by_book_id(rows: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|candidate| seen.insert(candidate.book.book_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendationSource;
    use bookstar_core::models::book::BookSummary;

    fn candidate(book_id: i64, source: RecommendationSource) -> Candidate {
        Candidate {
            book: BookSummary {
                book_id,
                title: None,
                author: None,
                category: None,
                image_url: None,
            },
            weight: 0.0,
            source,
        }
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let rows = vec![
            candidate(1, RecommendationSource::Content),
            candidate(2, RecommendationSource::Content),
            candidate(1, RecommendationSource::Collaborative),
            candidate(3, RecommendationSource::Collaborative),
        ];

        let deduped = dedup_by_book_id(rows);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].book.book_id, 1);
        assert_eq!(deduped[0].source, RecommendationSource::Content);
        assert_eq!(deduped[2].book.book_id, 3);
    }
}
