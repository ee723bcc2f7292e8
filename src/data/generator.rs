use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

use super::Song;

const TEMPO_RANGE: (f64, f64) = (60.0, 200.0);
const PITCH_RANGE: (f64, f64) = (30.0, 90.0);
const DURATION_RANGE: (f64, f64) = (90.0, 420.0);

/// Generates random songs with uniformly distributed features.
///
/// The same seed always yields the same songs, which keeps benchmarks and
/// tests reproducible.
pub struct SongGenerator {
    count: usize,
    rng: StdRng,
}

impl SongGenerator {
    pub fn new(count: usize, seed: u64) -> Self {
        SongGenerator {
            count,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns `count` songs with ids `1..=count`.
    pub fn generate(&mut self) -> Vec<Song> {
        let tempo = Uniform::from(TEMPO_RANGE.0..TEMPO_RANGE.1);
        let pitch = Uniform::from(PITCH_RANGE.0..PITCH_RANGE.1);
        let duration = Uniform::from(DURATION_RANGE.0..DURATION_RANGE.1);

        (1..=self.count as u64)
            .map(|id| {
                Song::new(
                    id,
                    tempo.sample(&mut self.rng),
                    pitch.sample(&mut self.rng),
                    duration.sample(&mut self.rng),
                    format!("Generated Song {}", id),
                )
            })
            .collect()
    }
}
