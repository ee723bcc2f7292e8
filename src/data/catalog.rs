use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use crate::error::Result;

use super::Song;

/// The built-in catalog used when no catalog file is given.
pub fn sample_songs() -> Vec<Song> {
    vec![
        Song::new(1, 120.0, 55.0, 215.0, "Song A - Artist 1"),
        Song::new(2, 128.0, 60.0, 180.0, "Song B - Artist 2"),
        Song::new(3, 115.0, 50.0, 200.0, "Song C - Artist 3"),
        Song::new(4, 130.0, 65.0, 220.0, "Song D - Artist 4"),
        Song::new(5, 110.0, 45.0, 240.0, "Song E - Artist 5"),
        Song::new(6, 140.0, 70.0, 190.0, "Song F - Artist 6"),
        Song::new(7, 118.0, 52.0, 195.0, "Song G - Artist 7"),
        Song::new(8, 125.0, 58.0, 175.0, "Song H - Artist 8"),
        Song::new(9, 122.0, 57.0, 205.0, "Song I - Artist 9"),
        Song::new(10, 132.0, 63.0, 210.0, "Song J - Artist 10"),
    ]
}

/// Loads a catalog from a JSON array of songs.
///
/// Every song is validated before it is returned, so the songs can be handed
/// to an index directly.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Song>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let songs: Vec<Song> = serde_json::from_reader(reader)?;

    let mut seen = HashSet::with_capacity(songs.len());
    for song in &songs {
        song.validate()?;
        if !seen.insert(song.id) {
            log::warn!("Catalog {} contains song id {} more than once", path.display(), song.id);
        }
    }

    log::debug!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}
