use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vp_song_index::{
    benchmark::{self, logger::BenchmarkLogger, BenchmarkConfig, BenchmarkResult},
    data::catalog::{load_catalog, sample_songs},
    IndexKind, IndexType, KnnIndex, NaiveIndex, PartitionStrategy, Song, VpTree, VpTreeConfig,
};

#[derive(Debug, Parser)]
#[command(name = "vp-song-index", version, about = "Find similar songs with a vantage-point tree")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the songs closest to the given features
    Query {
        #[arg(long, allow_negative_numbers = true)]
        tempo: f64,
        #[arg(long, allow_negative_numbers = true)]
        pitch: f64,
        /// Duration in seconds
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,
        /// Number of neighbors to return
        #[arg(short, long, default_value_t = 3)]
        k: usize,
        /// JSON catalog to index instead of the built-in sample songs
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "vptree")]
        index: IndexKind,
        #[arg(long, value_enum, default_value = "standard")]
        strategy: PartitionStrategy,
        /// Seed for the vantage choice, random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Measure build time, query throughput and recall on generated songs
    Bench {
        #[arg(long, default_value_t = 10_000)]
        size: usize,
        #[arg(long, default_value_t = 100)]
        queries: usize,
        #[arg(short, long, default_value_t = 10)]
        k: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value = "standard")]
        strategy: PartitionStrategy,
        /// Write the result to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Query {
            tempo,
            pitch,
            duration,
            k,
            catalog,
            index,
            strategy,
            seed,
        } => {
            let songs = match catalog {
                Some(path) => load_catalog(&path)
                    .with_context(|| format!("Failed to load catalog {}", path.display()))?,
                None => sample_songs(),
            };
            let config = VpTreeConfig { seed, strategy };
            let index = create_index(index, songs, &config);

            let query = Song::query(tempo, pitch, duration)
                .context("Please provide valid values for every feature")?;
            let results = index.search(&query, k)?;

            for result in &results {
                println!("{}", result);
            }
        }
        Command::Bench {
            size,
            queries,
            k,
            seed,
            strategy,
            output,
        } => {
            let config = BenchmarkConfig {
                dataset_size: size,
                queries,
                k,
                seed,
                strategy,
            };
            let result = benchmark::run(&config)?;
            print_benchmark_report(&result);

            if let Some(path) = output {
                let mut logger = BenchmarkLogger::new();
                logger.add_record(&result);
                logger
                    .write_to_csv(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Saved benchmark result to {}", path.display());
            }
        }
    }

    Ok(())
}

fn create_index(kind: IndexKind, songs: Vec<Song>, config: &VpTreeConfig) -> IndexType<Song> {
    match kind {
        IndexKind::VpTree => IndexType::VpTree(VpTree::build_with(songs, config)),
        IndexKind::Naive => IndexType::Naive(NaiveIndex::new(songs)),
    }
}

fn print_benchmark_report(result: &BenchmarkResult) {
    println!("\n--- VP-Tree Benchmark Report ---");
    println!("Partitioning: {:?}", result.strategy);
    println!("Dataset Size: {}", result.dataset_size);
    println!("Indexed Items: {}", result.indexed_items);
    println!("Tree Depth: {}", result.tree_depth);
    println!("Build Time: {:?}", result.build_time);
    println!("Query Time ({} queries, k = {}): {:?}", result.queries, result.k, result.query_time);
    println!("Queries Per Second: {:.2}", result.queries_per_second);
    println!("Recall: {:.4}", result.recall);
    println!("--------------------------------\n");
}
