use crate::{
    data::QueryResult,
    error::{Error, Result},
};

use super::{KnnIndex, MetricItem};

/// Exhaustive scan over every item. Serves as ground truth for the VP-tree.
#[derive(Debug)]
pub struct NaiveIndex<T> {
    items: Vec<T>,
}

impl<T: MetricItem> NaiveIndex<T> {
    pub fn new(items: Vec<T>) -> Self {
        NaiveIndex { items }
    }

    pub fn search(&self, query: &T, k: usize) -> Result<Vec<QueryResult<'_, T>>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".to_string()));
        }

        let mut results = self
            .items
            .iter()
            .map(|item| QueryResult::new(item, query.distance_to(item)))
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.cmp(&b.distance));
        results.truncate(k);
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: MetricItem> KnnIndex<T> for NaiveIndex<T> {
    fn search<'a>(&'a self, query: &T, k: usize) -> Result<Vec<QueryResult<'a, T>>> {
        NaiveIndex::search(self, query, k)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::data::{catalog::sample_songs, Song};

    use super::*;

    #[test]
    fn test_nearest_neighbors() {
        let index = NaiveIndex::new(sample_songs());
        let query = Song::query(121.0, 56.0, 214.0).unwrap();

        let results = index.search(&query, 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].item.id, 1);
        assert_eq!(results[1].item.id, 9);
        assert!(results[0].distance <= results[1].distance);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = NaiveIndex::new(sample_songs());
        let query = Song::query(121.0, 56.0, 214.0).unwrap();

        assert_eq!(index.search(&query, 50).unwrap().len(), 10);
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let index = NaiveIndex::new(sample_songs());
        let query = Song::query(121.0, 56.0, 214.0).unwrap();

        assert!(matches!(
            index.search(&query, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_index() {
        let index: NaiveIndex<Song> = NaiveIndex::new(Vec::new());
        let query = Song::query(121.0, 56.0, 214.0).unwrap();

        assert!(index.is_empty());
        assert!(index.search(&query, 3).unwrap().is_empty());
    }
}
