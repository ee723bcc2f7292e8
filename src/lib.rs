//! Vantage-point tree index for nearest-neighbor search over song features.
//!
//! Songs are described by three scalar features (tempo, pitch, duration) and
//! compared with the Euclidean distance. The [`index::vptree::VpTree`] is built
//! once from a catalog and answers exact k-nearest-neighbor queries without
//! scanning the whole catalog.

pub mod benchmark;
pub mod data;
pub mod data_structures;
pub mod error;
pub mod index;

pub use data::{QueryResult, Song};
pub use error::{Error, Result};
pub use index::{
    naive::NaiveIndex,
    vptree::{PartitionStrategy, VpTree, VpTreeConfig},
    IndexKind, IndexType, KnnIndex, MetricItem,
};
