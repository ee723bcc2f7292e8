use clap::ValueEnum;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use construction::BuildStats;
use node::Node;

use crate::{data::QueryResult, error::Result};

use super::{KnnIndex, MetricItem};

mod construction;
mod node;
mod search;

/// Rule used to split a working subset around its median distance.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Copy, Clone, ValueEnum)]
pub enum PartitionStrategy {
    /// The vantage is stored in its node and the remaining items are split at
    /// the median index: the closer half goes left (`distance <= radius`),
    /// the median and the farther half go right (`distance >= radius`).
    /// Every item is kept exactly once.
    #[default]
    Standard,
    /// Every item, the vantage included, is sorted by distance and the item
    /// at the median index is dropped from both halves. The vantage may show
    /// up again further down the left subtree, so items can be lost or
    /// duplicated.
    Compatible,
}

#[derive(Debug, Default, Clone)]
pub struct VpTreeConfig {
    /// Seed for the vantage choice. A fresh entropy seed is used when absent.
    pub seed: Option<u64>,
    pub strategy: PartitionStrategy,
}

impl VpTreeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// A vantage-point tree answering exact k-nearest-neighbor queries.
///
/// The tree is built once and never mutated afterwards, so a shared reference
/// can serve queries from several threads at the same time.
#[derive(Debug)]
pub struct VpTree<T> {
    root: Option<Box<Node<T>>>,
    /// Number of nodes, which is the number of items queries are answered from.
    len: usize,
    dropped_medians: usize,
    strategy: PartitionStrategy,
}

impl<T: MetricItem + Clone> VpTree<T> {
    /// Builds a tree with the standard partition strategy and a random seed.
    pub fn build(items: Vec<T>) -> Self {
        VpTree::build_with(items, &VpTreeConfig::default())
    }

    pub fn build_with(items: Vec<T>, config: &VpTreeConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let input_len = items.len();
        let mut stats = BuildStats::default();
        let root = VpTree::build_node(items, config.strategy, &mut rng, &mut stats);
        let tree = VpTree {
            root,
            len: stats.nodes,
            dropped_medians: stats.dropped_medians,
            strategy: config.strategy,
        };

        log::debug!(
            "Built VP-tree from {} items: {} nodes, depth {}, {:?} partitioning",
            input_len,
            tree.len,
            tree.depth(),
            tree.strategy
        );
        if tree.dropped_medians > 0 {
            log::warn!(
                "Compatible partitioning discarded {} median entries; the tree holds duplicated vantages in their place",
                tree.dropped_medians
            );
        }

        tree
    }
}

impl<T> VpTree<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path. Zero for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// Number of input entries discarded by median-dropping splits. Always
    /// zero for [`PartitionStrategy::Standard`].
    pub fn dropped_medians(&self) -> usize {
        self.dropped_medians
    }

    pub fn strategy(&self) -> PartitionStrategy {
        self.strategy
    }

    /// Iterates over the vantage of every node in pre-order.
    ///
    /// These are exactly the items a query can return. With
    /// [`PartitionStrategy::Compatible`] they can differ from the input.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }
}

impl<T: MetricItem> KnnIndex<T> for VpTree<T> {
    fn search<'a>(&'a self, query: &T, k: usize) -> Result<Vec<QueryResult<'a, T>>> {
        VpTree::search(self, query, k)
    }

    fn len(&self) -> usize {
        self.len
    }
}

pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.vantage)
    }
}

impl<'a, T> IntoIterator for &'a VpTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use crate::data::{catalog::sample_songs, generator::SongGenerator, Song};

    use super::*;

    fn seeded(seed: u64) -> VpTreeConfig {
        VpTreeConfig::default().with_seed(seed)
    }

    fn shape<T>(node: &Option<Box<Node<T>>>) -> String {
        match node {
            None => "-".to_string(),
            Some(node) => format!(
                "({} {} {})",
                node.radius,
                shape(&node.left),
                shape(&node.right)
            ),
        }
    }

    #[test]
    fn test_build_empty() {
        let tree: VpTree<Song> = VpTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_build_single_item() {
        let song = Song::new(1, 120.0, 55.0, 215.0, "Song A - Artist 1");
        let tree = VpTree::build(vec![song.clone()]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&song]);
    }

    #[test]
    fn test_standard_build_keeps_every_item_once() {
        let songs = SongGenerator::new(200, 11).generate();
        let tree = VpTree::build_with(songs.clone(), &seeded(5));
        assert_eq!(tree.len(), songs.len());

        let mut counts: HashMap<u64, usize> = HashMap::new();
        for song in &tree {
            *counts.entry(song.id).or_default() += 1;
        }
        assert_eq!(counts.len(), songs.len());
        assert!(counts.values().all(|&count| count == 1));
        assert_eq!(tree.dropped_medians(), 0);
    }

    #[test]
    fn test_standard_partition_invariant() {
        fn check(node: &Node<Song>) {
            let mut stack: Vec<(&Node<Song>, bool)> = Vec::new();
            if let Some(left) = node.left.as_deref() {
                stack.push((left, true));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, false));
            }
            while let Some((descendant, is_left)) = stack.pop() {
                let distance = node.vantage.distance_to(&descendant.vantage);
                if is_left {
                    assert!(distance <= node.radius);
                } else {
                    assert!(distance >= node.radius);
                }
                for child in [descendant.left.as_deref(), descendant.right.as_deref()]
                    .into_iter()
                    .flatten()
                {
                    stack.push((child, is_left));
                }
            }
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                check(child);
            }
        }

        let tree = VpTree::build_with(SongGenerator::new(120, 3).generate(), &seeded(9));
        check(tree.root.as_deref().unwrap());
    }

    #[test]
    fn test_compatible_build_drops_median_items() {
        // The median item of the root split is in neither half, while the
        // root vantage reappears in the left half. The node count stays at
        // the input size, so some item has to be held twice.
        let songs = sample_songs();
        for seed in 0..20 {
            let tree = VpTree::build_with(
                songs.clone(),
                &seeded(seed).with_strategy(PartitionStrategy::Compatible),
            );
            assert_eq!(tree.strategy(), PartitionStrategy::Compatible);
            assert_eq!(tree.len(), songs.len());
            assert_eq!(tree.iter().count(), tree.len());
            assert!(tree.iter().all(|song| songs.contains(song)));

            let distinct: HashSet<u64> = tree.iter().map(|song| song.id).collect();
            assert!(distinct.len() < songs.len());
            assert!(tree.dropped_medians() > 0);
        }
    }

    #[test]
    fn test_compatible_single_item_drops_nothing() {
        let song = Song::new(1, 120.0, 55.0, 215.0, "Song A - Artist 1");
        let tree = VpTree::build_with(
            vec![song],
            &seeded(1).with_strategy(PartitionStrategy::Compatible),
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.dropped_medians(), 0);
    }

    #[test]
    fn test_identical_songs_build_a_balanced_tree() {
        let songs: Vec<Song> = (1..=5000)
            .map(|id| Song::new(id, 120.0, 55.0, 215.0, format!("Copy {}", id)))
            .collect();
        let tree = VpTree::build_with(songs, &seeded(1));

        assert_eq!(tree.len(), 5000);
        // log2(5000) < 13; every split halves the remaining items.
        assert!(tree.depth() <= 14, "depth {}", tree.depth());

        let query = Song::query(120.0, 55.0, 215.0).unwrap();
        let results = tree.search(&query, 7).unwrap();
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|result| result.distance.into_inner() == 0.0));

        let far = Song::query(121.0, 55.0, 215.0).unwrap();
        let results = tree.search(&far, 3).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|result| result.distance.into_inner() == 1.0));
    }

    #[test]
    fn test_same_seed_same_shape() {
        let songs = SongGenerator::new(64, 1).generate();
        let first = VpTree::build_with(songs.clone(), &seeded(77));
        let second = VpTree::build_with(songs, &seeded(77));

        assert_eq!(shape(&first.root), shape(&second.root));
        assert_eq!(
            first.iter().map(|song| song.id).collect::<Vec<_>>(),
            second.iter().map(|song| song.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_depth_is_logarithmic_for_random_data() {
        let tree = VpTree::build_with(SongGenerator::new(1024, 8).generate(), &seeded(4));
        // log2(1024) = 10; allow generous slack for random vantage choices.
        assert!(tree.depth() >= 11);
        assert!(tree.depth() <= 40, "depth {}", tree.depth());
    }
}
