use rand::{rngs::StdRng, Rng};

use crate::index::MetricItem;

use super::{node::Node, PartitionStrategy, VpTree};

type Measured<T> = Vec<(T, f64)>;

/// Counters collected while a tree is built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct BuildStats {
    pub(super) nodes: usize,
    /// Median entries discarded by compatible splits. Each one is an input
    /// entry missing from its subtree, replaced by a second copy of the vantage.
    pub(super) dropped_medians: usize,
}

impl<T: MetricItem + Clone> VpTree<T> {
    /// Recursively builds the subtree for `items`.
    ///
    /// # Arguments
    ///
    /// * `items` - The working subset for this subtree.
    /// * `strategy` - How the subset is split around the median distance.
    /// * `rng` - Source for the random vantage choice.
    /// * `stats` - Updated once per created node.
    ///
    /// # Returns
    /// The root of the subtree, or `None` when `items` is empty.
    pub(super) fn build_node(
        items: Vec<T>,
        strategy: PartitionStrategy,
        rng: &mut StdRng,
        stats: &mut BuildStats,
    ) -> Option<Box<Node<T>>> {
        if items.is_empty() {
            return None;
        }

        let (vantage, mut measured) = match strategy {
            PartitionStrategy::Standard => measure_without_vantage(items, rng),
            PartitionStrategy::Compatible => measure_with_vantage(items, rng),
        };
        measured.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (radius, left_items, right_items) = match strategy {
            PartitionStrategy::Standard => split_around_median(measured),
            PartitionStrategy::Compatible => {
                // The vantage's own entry sorts first, so any split over two
                // or more entries discards some other entry.
                if measured.len() > 1 {
                    stats.dropped_medians += 1;
                }
                split_dropping_median(measured)
            }
        };

        stats.nodes += 1;
        let left = Self::build_node(left_items, strategy, rng, stats);
        let right = Self::build_node(right_items, strategy, rng, stats);

        Some(Box::new(Node {
            vantage,
            radius,
            left,
            right,
        }))
    }
}

/// Takes the vantage out of `items` and measures the remaining items against it.
fn measure_without_vantage<T: MetricItem>(
    mut items: Vec<T>,
    rng: &mut StdRng,
) -> (T, Measured<T>) {
    let index = rng.gen_range(0..items.len());
    let vantage = items.swap_remove(index);
    let measured = items
        .into_iter()
        .map(|item| {
            let distance = vantage.distance_to(&item);
            (item, distance)
        })
        .collect();
    (vantage, measured)
}

/// Measures every item, the vantage included, against a copy of the vantage.
///
/// The vantage entry is moved to the front, so after the stable sort it stays
/// ahead of any other item at distance zero.
fn measure_with_vantage<T: MetricItem + Clone>(
    mut items: Vec<T>,
    rng: &mut StdRng,
) -> (T, Measured<T>) {
    let index = rng.gen_range(0..items.len());
    items.swap(0, index);
    let vantage = items[0].clone();
    let measured = items
        .into_iter()
        .map(|item| {
            let distance = vantage.distance_to(&item);
            (item, distance)
        })
        .collect();
    (vantage, measured)
}

/// Splits sorted pairs at the median index. The left side holds the pairs
/// before the median, at most `radius` away, and the right side the median
/// and everything after it, at least `radius` away. No item is lost and both
/// halves stay balanced when many items share the median distance.
fn split_around_median<T>(mut measured: Measured<T>) -> (f64, Vec<T>, Vec<T>) {
    if measured.is_empty() {
        return (0.0, Vec::new(), Vec::new());
    }

    let median = measured.len() / 2;
    let radius = measured[median].1;
    let right = measured.split_off(median);

    (radius, into_items(measured), into_items(right))
}

/// Splits sorted pairs at the median index and discards the median pair
/// itself.
fn split_dropping_median<T>(mut measured: Measured<T>) -> (f64, Vec<T>, Vec<T>) {
    let median = measured.len() / 2;
    let radius = measured[median].1;
    let right = measured.split_off(median + 1);
    measured.truncate(median);

    (radius, into_items(measured), into_items(right))
}

fn into_items<T>(measured: Measured<T>) -> Vec<T> {
    measured.into_iter().map(|(item, _)| item).collect()
}
