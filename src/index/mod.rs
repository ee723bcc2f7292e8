use std::fmt::Debug;

use clap::ValueEnum;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use naive::NaiveIndex;
use vptree::VpTree;

use crate::{data::QueryResult, error::Result};

pub mod naive;
pub mod vptree;

/// An item living in a metric space.
///
/// `distance_to` has to be symmetric, non-negative, zero for identical
/// features and satisfy the triangle inequality. The VP-tree relies on the
/// triangle inequality to prune subtrees during search.
pub trait MetricItem {
    fn distance_to(&self, other: &Self) -> f64;
}

pub trait KnnIndex<T: MetricItem> {
    /// Returns up to `k` items closest to `query`, ordered by ascending
    /// distance. Fails with `InvalidArgument` when `k` is zero.
    fn search<'a>(&'a self, query: &T, k: usize) -> Result<Vec<QueryResult<'a, T>>>;

    /// Number of items the index answers from.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs independent queries in parallel against the same index.
    fn search_batch<'a>(&'a self, queries: &[T], k: usize) -> Result<Vec<Vec<QueryResult<'a, T>>>>
    where
        Self: Sync,
        T: Sync,
    {
        queries.par_iter().map(|query| self.search(query, k)).collect()
    }
}

#[derive(PartialEq, Eq, Copy, Clone, ValueEnum)]
pub enum IndexKind {
    #[value(name = "vptree")]
    VpTree,
    Naive,
}

impl Debug for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::VpTree => write!(f, "VpTree"),
            IndexKind::Naive => write!(f, "Naive"),
        }
    }
}

#[derive(Debug)]
pub enum IndexType<T> {
    VpTree(VpTree<T>),
    Naive(NaiveIndex<T>),
}

impl<T> IndexType<T> {
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexType::VpTree(_) => IndexKind::VpTree,
            IndexType::Naive(_) => IndexKind::Naive,
        }
    }
}

impl<T: MetricItem> KnnIndex<T> for IndexType<T> {
    fn search<'a>(&'a self, query: &T, k: usize) -> Result<Vec<QueryResult<'a, T>>> {
        match self {
            IndexType::VpTree(index) => index.search(query, k),
            IndexType::Naive(index) => index.search(query, k),
        }
    }

    fn len(&self) -> usize {
        match self {
            IndexType::VpTree(index) => index.len(),
            IndexType::Naive(index) => index.len(),
        }
    }
}
