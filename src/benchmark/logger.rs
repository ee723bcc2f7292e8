use std::{fs::File, path::Path};

use chrono::{DateTime, Local};
use csv::Writer;
use serde::Serialize;

use crate::{error::Result, index::vptree::PartitionStrategy};

use super::BenchmarkResult;

/// A single benchmark record that can be serialized to CSV.
///
/// Holds the same values as `BenchmarkResult`, with durations flattened to
/// seconds and the time the result was recorded.
#[derive(Serialize)]
struct BenchmarkRecord {
    pub recorded_at: String,
    pub strategy: PartitionStrategy,
    pub dataset_size: usize,
    pub indexed_items: usize,
    pub tree_depth: usize,
    pub queries: usize,
    pub k: usize,
    pub build_time: f64,
    pub query_time: f64,
    pub queries_per_second: f64,
    pub recall: f64,
}

#[derive(Debug, Default)]
pub struct BenchmarkLogger {
    records: Vec<(DateTime<Local>, BenchmarkResult)>,
}

impl BenchmarkLogger {
    pub fn new() -> Self {
        BenchmarkLogger {
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, result: &BenchmarkResult) {
        self.records.push((Local::now(), *result));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to_csv(&self, file_path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(file_path.as_ref())?;
        let mut writer = Writer::from_writer(file);

        for (recorded_at, result) in &self.records {
            writer.serialize(BenchmarkRecord {
                recorded_at: recorded_at.to_rfc3339(),
                strategy: result.strategy,
                dataset_size: result.dataset_size,
                indexed_items: result.indexed_items,
                tree_depth: result.tree_depth,
                queries: result.queries,
                k: result.k,
                build_time: result.build_time.as_secs_f64(),
                query_time: result.query_time.as_secs_f64(),
                queries_per_second: result.queries_per_second,
                recall: result.recall,
            })?;
        }

        writer.flush()?;
        log::debug!(
            "Wrote {} benchmark records to {}",
            self.records.len(),
            file_path.as_ref().display()
        );
        Ok(())
    }
}
