//! Peer similarity search
//!
//! Finds the members whose reading behavior is closest to a target member.
//! The search scans every member-book relation in the system into a dense
//! binary incidence matrix (rows = members in first-seen order, columns =
//! the union of all referenced book ids) and runs a k-nearest-neighbor
//! search by Euclidean distance over the rows. The shared comparison space
//! is the point: similarity is only meaningful against all members at once.
//!
//! Computed neighbor sets are memoized per (member id, k).

use crate::cache::EngineCache;
use crate::store::BookStore;
use anyhow::Result;
use bookstar_core::math::l2_distance;
use ndarray::Array2;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Nearest-neighbor search over member reading behavior
#[derive(Clone)]
pub struct PeerFinder {
    store: Arc<dyn BookStore>,
    cache: Arc<EngineCache>,
}

impl PeerFinder {
    pub fn new(store: Arc<dyn BookStore>, cache: Arc<EngineCache>) -> Self {
        Self { store, cache }
    }

    /// Up to `k` member ids most similar to `member_id`, nearest first
    ///
    /// The target member never appears in its own result. Returns an empty
    /// set when the member has no relations or fewer than 2 members exist
    /// system-wide; a degenerate search is downgraded to empty, never an
    /// error.
    pub async fn similar_members(&self, member_id: i64, k: usize) -> Result<Arc<Vec<i64>>> {
        if let Some(hit) = self.cache.peers(member_id, k) {
            debug!(member_id, k, "peer set served from cache");
            return Ok(hit);
        }

        let relations = self.store.all_member_books().await?;

        // First-seen member order defines the matrix rows
        let mut member_order: Vec<i64> = Vec::new();
        let mut books_by_member: HashMap<i64, HashSet<i64>> = HashMap::new();
        for (mid, book_id) in relations {
            books_by_member
                .entry(mid)
                .or_insert_with(|| {
                    member_order.push(mid);
                    HashSet::new()
                })
                .insert(book_id);
        }

        if !books_by_member.contains_key(&member_id) {
            debug!(member_id, "member has no relations, no peers to find");
            return Ok(Arc::new(Vec::new()));
        }

        let peers = Arc::new(Self::knn_search(&member_order, &books_by_member, member_id, k));
        self.cache.store_peers(member_id, k, peers.clone());
        Ok(peers)
    }

    /// Brute-force k-nearest-neighbor search over binary incidence rows
    fn knn_search(
        member_order: &[i64],
        books_by_member: &HashMap<i64, HashSet<i64>>,
        member_id: i64,
        k: usize,
    ) -> Vec<i64> {
        let num_members = member_order.len();
        if num_members < 2 {
            warn!(member_id, num_members, "not enough members for similarity search");
            return Vec::new();
        }

        let all_books: BTreeSet<i64> = books_by_member
            .values()
            .flat_map(|books| books.iter().copied())
            .collect();
        let all_books: Vec<i64> = all_books.into_iter().collect();

        let mut matrix = Array2::<f32>::zeros((num_members, all_books.len()));
        for (row, mid) in member_order.iter().enumerate() {
            if let Some(books) = books_by_member.get(mid) {
                for (col, book_id) in all_books.iter().enumerate() {
                    if books.contains(book_id) {
                        matrix[[row, col]] = 1.0;
                    }
                }
            }
        }

        let Some(target_row) = member_order.iter().position(|&mid| mid == member_id) else {
            warn!(member_id, "target member missing from incidence matrix");
            return Vec::new();
        };
        let target: Vec<f32> = matrix.row(target_row).to_vec();

        // n_neighbors counts the target matching itself, hence k + 1
        let n_neighbors = (k + 1).min(num_members);

        let mut distances: Vec<(f32, usize)> = (0..num_members)
            .map(|row| (l2_distance(&matrix.row(row).to_vec(), &target), row))
            .collect();
        // Stable sort: ties keep row order
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        distances
            .into_iter()
            .take(n_neighbors)
            .filter(|&(_, row)| row != target_row)
            .map(|(_, row)| member_order[row])
            .take(k)
            .collect()
    }
}
