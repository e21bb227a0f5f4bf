//! Collaborative scoring
//!
//! Produces candidates from the reading behavior of a member's nearest
//! peers: the distinct set of books any peer has touched, minus the books
//! the member already has a relation to, capped at the requested count in
//! storage order. The rows deliberately carry no agreement-strength weight;
//! this path contributes membership ("a peer touched this"), not a score.

use crate::preferences::PreferenceExtractor;
use crate::similarity::PeerFinder;
use crate::store::BookStore;
use crate::types::{Candidate, RecommendationSource, ScorerOutcome};
use anyhow::Result;
use bookstar_core::config::RecommendationConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Peer-behavior candidate lookup
#[derive(Clone)]
pub struct CollaborativeScorer {
    store: Arc<dyn BookStore>,
    extractor: PreferenceExtractor,
    peers: PeerFinder,
    config: RecommendationConfig,
}

impl CollaborativeScorer {
    pub fn new(
        store: Arc<dyn BookStore>,
        extractor: PreferenceExtractor,
        peers: PeerFinder,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            peers,
            config,
        }
    }

    /// Candidates drawn from the member's nearest peers
    pub async fn score(&self, member_id: i64, n: usize) -> ScorerOutcome {
        match self.try_score(member_id, n).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(member_id, error = %e, "collaborative scoring failed");
                ScorerOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_score(&self, member_id: i64, n: usize) -> Result<ScorerOutcome> {
        let peers = self
            .peers
            .similar_members(member_id, self.config.similar_users_count)
            .await?;
        if peers.is_empty() {
            debug!(member_id, "no similar members found");
            return Ok(ScorerOutcome::Empty);
        }

        let peer_books = self.store.member_book_ids(&peers).await?;
        if peer_books.is_empty() {
            return Ok(ScorerOutcome::Empty);
        }

        let lists = self.extractor.reading_lists(member_id).await?;
        let seen: HashSet<i64> = lists.all_ids().into_iter().collect();
        let unseen: Vec<i64> = peer_books
            .into_iter()
            .filter(|id| !seen.contains(id))
            .collect();
        if unseen.is_empty() {
            debug!(member_id, "peers only touched books the member already has");
            return Ok(ScorerOutcome::Empty);
        }

        let books = self.store.books_by_ids(&unseen, n).await?;
        if books.is_empty() {
            return Ok(ScorerOutcome::Empty);
        }

        let candidates = books
            .into_iter()
            .map(|book| Candidate {
                book,
                weight: 0.0,
                source: RecommendationSource::Collaborative,
            })
            .collect();

        Ok(ScorerOutcome::Scored(candidates))
    }
}
