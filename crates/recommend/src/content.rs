//! Content-based scoring
//!
//! Joins the catalog against a member's preference scores to produce a
//! weighted-ranked candidate table, excluding every book the member already
//! has a relation to. Members with no preference signal fall back to
//! uniform catalog sampling.

use crate::preferences::PreferenceExtractor;
use crate::store::BookStore;
use crate::types::{Candidate, RecommendationSource, ScorerOutcome};
use anyhow::Result;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Uniform-random sample of `n` catalog rows
///
/// The shared random fallback: used by the content scorer when a member has
/// no preference signal, and by the combiner when no scorer produces
/// anything. Sampling is without replacement; a catalog smaller than `n`
/// yields the whole catalog in random order.
pub(crate) async fn random_candidates(store: &dyn BookStore, n: usize) -> Result<Vec<Candidate>> {
    let catalog = store.catalog_excluding(&[]).await?;

    let mut rng = rand::thread_rng();
    let sampled = catalog
        .choose_multiple(&mut rng, n)
        .cloned()
        .map(|book| Candidate {
            book,
            weight: 0.0,
            source: RecommendationSource::Random,
        })
        .collect();

    Ok(sampled)
}

/// Preference-weighted catalog ranking
#[derive(Clone)]
pub struct ContentScorer {
    store: Arc<dyn BookStore>,
    extractor: PreferenceExtractor,
}

impl ContentScorer {
    pub fn new(store: Arc<dyn BookStore>, extractor: PreferenceExtractor) -> Self {
        Self { store, extractor }
    }

    /// Rank the unseen catalog by the member's preference weights
    ///
    /// Every candidate's weight is the sum of the member's accumulated
    /// category weight and author weight for that book; missing metadata
    /// contributes zero. Ranking uses a stable descending sort, so equal
    /// weights keep the catalog row order.
    pub async fn score(&self, member_id: i64, n: usize) -> ScorerOutcome {
        match self.try_score(member_id, n).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(member_id, error = %e, "content scoring failed");
                ScorerOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_score(&self, member_id: i64, n: usize) -> Result<ScorerOutcome> {
        let Some(preferences) = self.extractor.preferences(member_id).await? else {
            info!(member_id, "no preference signal, sampling the catalog");
            let sampled = random_candidates(self.store.as_ref(), n).await?;
            return Ok(if sampled.is_empty() {
                ScorerOutcome::Empty
            } else {
                ScorerOutcome::Scored(sampled)
            });
        };

        let lists = self.extractor.reading_lists(member_id).await?;
        let catalog = self.store.catalog_excluding(&lists.all_ids()).await?;
        if catalog.is_empty() {
            return Ok(ScorerOutcome::Empty);
        }

        let mut candidates: Vec<Candidate> = catalog
            .into_iter()
            .map(|book| {
                let category_weight = book
                    .category
                    .and_then(|c| preferences.categories.get(&c).copied())
                    .unwrap_or(0.0);
                let author_weight = book
                    .author
                    .as_deref()
                    .and_then(|a| preferences.authors.get(a).copied())
                    .unwrap_or(0.0);

                Candidate {
                    book,
                    weight: category_weight + author_weight,
                    source: RecommendationSource::Content,
                }
            })
            .collect();

        candidates.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        candidates.truncate(n);

        Ok(ScorerOutcome::Scored(candidates))
    }
}
