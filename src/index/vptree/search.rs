use ordered_float::OrderedFloat;

use crate::{
    data::QueryResult,
    data_structures::max_heap::MaxHeap,
    error::{Error, Result},
    index::MetricItem,
};

use super::{node::Node, VpTree};

type Candidates<'a, T> = MaxHeap<QueryResult<'a, T>>;

impl<T: MetricItem> VpTree<T> {
    /// Finds the `k` items closest to `query`.
    ///
    /// Returns at most `k` results ordered by ascending distance, fewer when
    /// the tree holds fewer items. Items at equal distance come back in no
    /// particular order.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when `k` is zero.
    ///
    /// # Examples
    /// ```
    /// use vp_song_index::{Song, VpTree};
    ///
    /// let tree = VpTree::build(vec![
    ///     Song::new(1, 120.0, 55.0, 215.0, "Song A - Artist 1"),
    ///     Song::new(2, 128.0, 60.0, 180.0, "Song B - Artist 2"),
    ///     Song::new(3, 115.0, 50.0, 200.0, "Song C - Artist 3"),
    /// ]);
    /// let query = Song::query(121.0, 56.0, 214.0).unwrap();
    /// let results = tree.search(&query, 2).unwrap();
    /// assert_eq!(results[0].item.id, 1);
    /// assert_eq!(results[1].item.id, 3);
    /// ```
    pub fn search(&self, query: &T, k: usize) -> Result<Vec<QueryResult<'_, T>>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }

        let mut candidates = MaxHeap::with_capacity(k);
        if let Some(root) = self.root.as_deref() {
            search_node(root, query, k, &mut candidates);
        }

        Ok(candidates.into_sorted_vec())
    }
}

fn search_node<'a, T: MetricItem>(
    node: &'a Node<T>,
    query: &T,
    k: usize,
    candidates: &mut Candidates<'a, T>,
) {
    let distance = query.distance_to(&node.vantage);
    offer(candidates, k, &node.vantage, distance);

    if distance < node.radius {
        if let Some(left) = node.left.as_deref() {
            search_node(left, query, k, candidates);
        }
        if let Some(right) = node.right.as_deref() {
            if distance + threshold(candidates, k) >= node.radius {
                search_node(right, query, k, candidates);
            }
        }
    } else {
        if let Some(right) = node.right.as_deref() {
            search_node(right, query, k, candidates);
        }
        if let Some(left) = node.left.as_deref() {
            if distance - threshold(candidates, k) <= node.radius {
                search_node(left, query, k, candidates);
            }
        }
    }
}

/// Records `item` when there is room or when it beats the current worst
/// candidate, which is evicted.
fn offer<'a, T>(candidates: &mut Candidates<'a, T>, k: usize, item: &'a T, distance: f64) {
    let score = OrderedFloat(distance);
    if candidates.len() < k {
        candidates.push(QueryResult::new(item, distance), score);
    } else if candidates.peek_score().is_some_and(|worst| score < worst) {
        candidates.pop();
        candidates.push(QueryResult::new(item, distance), score);
    }
    debug_assert!(candidates.len() <= k);
}

/// Distance a subtree has to come within to possibly hold a better candidate.
/// Nothing can be pruned until `k` candidates are collected.
fn threshold<T>(candidates: &Candidates<'_, T>, k: usize) -> f64 {
    if candidates.len() < k {
        return f64::INFINITY;
    }
    candidates
        .peek_score()
        .map_or(f64::INFINITY, |worst| worst.into_inner())
}
