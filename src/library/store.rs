use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::{self, StoreError};
use crate::track::Track;

/// The on-disk document. Artists and albums are derived groupings and are
/// recomputed from the track list rather than persisted.
#[derive(Default, Serialize, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

/// An album grouping: tracks sharing an album and artist.
#[derive(Debug)]
pub struct AlbumGroup<'a> {
    pub album: &'a str,
    pub artist: &'a str,
    pub tracks: Vec<&'a Track>,
}

/// The local library, persisted whole-file after every mutation.
pub struct Library {
    tracks: Vec<Track>,
    path: PathBuf,
}

impl Library {
    /// Open the library at `path`, starting empty when the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file: LibraryFile = storage::load_json(&path)?;
        log::info!(
            "library: loaded {} tracks from {}",
            file.tracks.len(),
            path.display()
        );
        Ok(Self {
            tracks: file.tracks,
            path,
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Add a track, de-duplicating by identity key. Returns whether the
    /// track was actually added.
    pub fn add_track(&mut self, track: Track) -> Result<bool, StoreError> {
        if self.tracks.iter().any(|t| t.same_identity(&track)) {
            log::debug!("library: '{}' already present, skipping", track.title);
            return Ok(false);
        }
        self.tracks.push(track);
        self.save()?;
        Ok(true)
    }

    /// Remove the track at `index` and rewrite the store.
    pub fn remove_track(&mut self, index: usize) -> Result<Track, StoreError> {
        if index >= self.tracks.len() {
            return Err(StoreError::BadIndex(index));
        }
        let removed = self.tracks.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Case-insensitive substring filter over title, artist and album.
    pub fn filter(&self, query: &str) -> Vec<&Track> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.tracks.iter().collect();
        }
        self.tracks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query)
                    || t.artist.to_lowercase().contains(&query)
                    || t.album.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Group the library by artist, sorted by artist name.
    pub fn artists(&self) -> BTreeMap<&str, Vec<&Track>> {
        let mut grouped: BTreeMap<&str, Vec<&Track>> = BTreeMap::new();
        for track in &self.tracks {
            grouped.entry(track.artist.as_str()).or_default().push(track);
        }
        grouped
    }

    /// Group the library by album, keyed by "album - artist" so identically
    /// named albums from different artists stay separate.
    pub fn albums(&self) -> BTreeMap<String, AlbumGroup<'_>> {
        let mut grouped: BTreeMap<String, AlbumGroup<'_>> = BTreeMap::new();
        for track in &self.tracks {
            let key = format!("{} - {}", track.album, track.artist);
            grouped
                .entry(key)
                .or_insert_with(|| AlbumGroup {
                    album: &track.album,
                    artist: &track.artist,
                    tracks: Vec::new(),
                })
                .tracks
                .push(track);
        }
        grouped
    }

    fn save(&self) -> Result<(), StoreError> {
        let file = LibraryFile {
            tracks: self.tracks.clone(),
        };
        storage::save_json(&self.path, &file)
    }
}
