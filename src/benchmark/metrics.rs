use std::time::Duration;

/// Slack for comparing distances computed along different code paths.
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Calculates the number of queries per second from the total time taken to
/// execute `queries` queries.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use vp_song_index::benchmark::metrics::calculate_queries_per_second;
///
/// let queries_per_second = calculate_queries_per_second(Duration::from_secs(2), 100);
/// assert_eq!(queries_per_second, 50.0);
/// ```
pub fn calculate_queries_per_second(total_queries_execution_time: Duration, queries: usize) -> f64 {
    if !total_queries_execution_time.is_zero() {
        queries as f64 / total_queries_execution_time.as_secs_f64()
    } else {
        0.0
    }
}

/// Fraction of the true `k` nearest neighbors an index returned.
///
/// Neighbors are compared by distance rather than identity: any result at
/// most as far as the k-th true neighbor counts as a hit, so items tied at
/// the boundary are not treated as misses.
pub fn calculate_recall(result_distances: &[f64], groundtruth_distances: &[f64], k: usize) -> f64 {
    let expected = groundtruth_distances.len().min(k);
    if expected == 0 {
        return 1.0;
    }

    let boundary = groundtruth_distances[expected - 1] + DISTANCE_TOLERANCE;
    let hits = result_distances
        .iter()
        .take(k)
        .filter(|&&distance| distance <= boundary)
        .count()
        .min(expected);

    hits as f64 / expected as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_queries_per_second_normal_case() {
        let qps = calculate_queries_per_second(Duration::from_secs(1), 1);
        assert_eq!(qps, 1.0);
    }

    #[test]
    fn test_queries_per_second_fractional_result() {
        let qps = calculate_queries_per_second(Duration::from_millis(500), 1);
        assert_eq!(qps, 2.0);
    }

    #[test]
    fn test_queries_per_second_zero_duration() {
        let qps = calculate_queries_per_second(Duration::from_secs(0), 10);
        assert_eq!(qps, 0.0);
    }

    #[test]
    fn test_recall_perfect() {
        let groundtruth = [1.0, 2.0, 3.0];
        assert_eq!(calculate_recall(&groundtruth, &groundtruth, 3), 1.0);
    }

    #[test]
    fn test_recall_partial() {
        let groundtruth = [1.0, 2.0, 3.0, 4.0];
        let results = [1.0, 2.0, 5.0, 6.0];
        assert_eq!(calculate_recall(&results, &groundtruth, 4), 0.5);
    }

    #[test]
    fn test_recall_counts_ties_as_hits() {
        let groundtruth = [1.0, 2.0, 2.0];
        let results = [1.0, 2.0, 2.0];
        assert_eq!(calculate_recall(&results, &groundtruth, 3), 1.0);
    }

    #[test]
    fn test_recall_without_groundtruth() {
        assert_eq!(calculate_recall(&[], &[], 5), 1.0);
    }
}
