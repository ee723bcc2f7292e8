use std::fmt::{self, Display};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    index::MetricItem,
};

pub mod catalog;
pub mod generator;

/// A song described by the three features the index compares on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: u64,
    pub title: String,
    /// Beats per minute.
    pub tempo: f64,
    pub pitch: f64,
    /// Length in seconds.
    pub duration: f64,
}

impl Song {
    pub fn new(id: u64, tempo: f64, pitch: f64, duration: f64, title: impl Into<String>) -> Self {
        Song {
            id,
            title: title.into(),
            tempo,
            pitch,
            duration,
        }
    }

    /// Builds a transient query song from user supplied features.
    ///
    /// Every feature has to be a finite number, otherwise an
    /// [`Error::InvalidArgument`] is returned.
    ///
    /// # Examples
    /// ```
    /// use vp_song_index::Song;
    ///
    /// let query = Song::query(121.0, 56.0, 214.0).unwrap();
    /// assert_eq!(query.id, 0);
    /// assert!(Song::query(f64::NAN, 56.0, 214.0).is_err());
    /// ```
    pub fn query(tempo: f64, pitch: f64, duration: f64) -> Result<Self> {
        let song = Song::new(0, tempo, pitch, duration, "Query Song");
        song.validate()?;
        Ok(song)
    }

    /// Checks that all features are finite numbers.
    pub fn validate(&self) -> Result<()> {
        let names = ["tempo", "pitch", "duration"];
        for (name, value) in names.iter().zip(self.features()) {
            if !value.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "song {} has a non-finite {}: {}",
                    self.id, name, value
                )));
            }
        }
        Ok(())
    }

    pub fn features(&self) -> [f64; 3] {
        [self.tempo, self.pitch, self.duration]
    }

    /// Straight-line distance between the feature tuples of two songs.
    pub fn euclidean_distance(&self, other: &Song) -> f64 {
        self.features()
            .iter()
            .zip(other.features().iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl MetricItem for Song {
    fn distance_to(&self, other: &Self) -> f64 {
        self.euclidean_distance(other)
    }
}

/// One entry of a k-NN answer: a borrowed item of the index and its distance
/// to the query.
#[derive(Debug, PartialEq)]
pub struct QueryResult<'a, T> {
    pub item: &'a T,
    pub distance: OrderedFloat<f64>,
}

impl<'a, T> QueryResult<'a, T> {
    pub fn new(item: &'a T, distance: f64) -> Self {
        QueryResult {
            item,
            distance: OrderedFloat(distance),
        }
    }
}

impl<T> Clone for QueryResult<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QueryResult<'_, T> {}

impl Display for QueryResult<'_, Song> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let song = self.item;
        write!(
            f,
            "{} (ID: {}, Tempo: {}, Pitch: {}, Duration: {}s, Distance: {:.2})",
            song.title,
            song.id,
            song.tempo,
            song.pitch,
            song.duration,
            self.distance.into_inner()
        )
    }
}
