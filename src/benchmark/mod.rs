use std::time::Duration;

use crate::{
    data::{generator::SongGenerator, QueryResult, Song},
    error::{Error, Result},
    index::{
        naive::NaiveIndex,
        vptree::{PartitionStrategy, VpTree, VpTreeConfig},
        KnnIndex,
    },
};

#[macro_use]
pub mod macros;
pub mod logger;
pub mod metrics;

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of generated songs the tree is built from.
    pub dataset_size: usize,
    /// Number of generated query songs.
    pub queries: usize,
    pub k: usize,
    /// Seeds the catalog, the queries and the vantage choice.
    pub seed: u64,
    pub strategy: PartitionStrategy,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            dataset_size: 10_000,
            queries: 100,
            k: 10,
            seed: 42,
            strategy: PartitionStrategy::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkResult {
    pub strategy: PartitionStrategy,
    pub dataset_size: usize,
    /// Items the built tree answers from.
    pub indexed_items: usize,
    pub tree_depth: usize,
    pub queries: usize,
    pub k: usize,
    pub build_time: Duration,
    /// Total time for running every query one after another.
    pub query_time: Duration,
    pub queries_per_second: f64,
    /// Mean recall against an exhaustive scan over the generated songs.
    pub recall: f64,
}

/// Builds a VP-tree over generated songs, runs the generated queries against
/// it and compares the answers with an exhaustive scan.
pub fn run(config: &BenchmarkConfig) -> Result<BenchmarkResult> {
    if config.queries == 0 {
        return Err(Error::InvalidArgument(
            "benchmark needs at least one query".to_string(),
        ));
    }

    let songs = SongGenerator::new(config.dataset_size, config.seed).generate();
    let queries = SongGenerator::new(config.queries, config.seed.wrapping_add(1)).generate();
    let naive = NaiveIndex::new(songs.clone());

    let tree_config = VpTreeConfig::default()
        .with_seed(config.seed)
        .with_strategy(config.strategy);
    let (tree, build_time) = measure_time!(VpTree::build_with(songs, &tree_config));
    log::info!(
        "Built VP-tree over {} songs in {:?}",
        config.dataset_size,
        build_time
    );

    let (results, query_time) = measure_time!(queries
        .iter()
        .map(|query| tree.search(query, config.k))
        .collect::<Result<Vec<_>>>());
    let results = results?;
    log::info!("Ran {} queries in {:?}", queries.len(), query_time);

    let groundtruth = naive.search_batch(&queries, config.k)?;
    let recall = results
        .iter()
        .zip(groundtruth.iter())
        .map(|(result, truth)| {
            metrics::calculate_recall(&distances(result), &distances(truth), config.k)
        })
        .sum::<f64>()
        / queries.len() as f64;

    Ok(BenchmarkResult {
        strategy: config.strategy,
        dataset_size: config.dataset_size,
        indexed_items: tree.len(),
        tree_depth: tree.depth(),
        queries: queries.len(),
        k: config.k,
        build_time,
        query_time,
        queries_per_second: metrics::calculate_queries_per_second(query_time, queries.len()),
        recall,
    })
}

fn distances(results: &[QueryResult<'_, Song>]) -> Vec<f64> {
    results
        .iter()
        .map(|result| result.distance.into_inner())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(strategy: PartitionStrategy) -> BenchmarkConfig {
        BenchmarkConfig {
            dataset_size: 2_000,
            queries: 25,
            k: 10,
            seed: 42,
            strategy,
        }
    }

    #[test]
    fn test_standard_benchmark_has_full_recall() {
        let result = run(&config(PartitionStrategy::Standard)).unwrap();
        assert_eq!(result.dataset_size, 2_000);
        assert_eq!(result.indexed_items, 2_000);
        assert_eq!(result.queries, 25);
        assert!(result.tree_depth >= 11);
        assert_eq!(result.recall, 1.0);
        assert!(result.queries_per_second >= 0.0);
    }

    #[test]
    fn test_compatible_benchmark_runs() {
        let result = run(&config(PartitionStrategy::Compatible)).unwrap();
        assert_eq!(result.strategy, PartitionStrategy::Compatible);
        assert_eq!(result.indexed_items, 2_000);
        assert!(result.recall > 0.0 && result.recall <= 1.0);
    }

    #[test]
    fn test_invalid_benchmark_config() {
        let mut no_queries = config(PartitionStrategy::Standard);
        no_queries.queries = 0;
        assert!(matches!(run(&no_queries), Err(Error::InvalidArgument(_))));

        let mut zero_k = config(PartitionStrategy::Standard);
        zero_k.k = 0;
        assert!(matches!(run(&zero_k), Err(Error::InvalidArgument(_))));
    }
}
