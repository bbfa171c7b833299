use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::storage::{self, StoreError};
use crate::track::Track;

/// All playlists, persisted whole-file after every mutation. Names are kept
/// in a `BTreeMap` so listing order is stable.
pub struct Playlists {
    playlists: BTreeMap<String, Vec<Track>>,
    path: PathBuf,
}

impl Playlists {
    /// Open the playlist store at `path`, starting empty when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let playlists: BTreeMap<String, Vec<Track>> = storage::load_json(&path)?;
        log::info!(
            "playlists: loaded {} playlists from {}",
            playlists.len(),
            path.display()
        );
        Ok(Self { playlists, path })
    }

    pub fn names(&self) -> Vec<&str> {
        self.playlists.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Tracks of a playlist, in playback order.
    pub fn tracks(&self, name: &str) -> Result<&[Track], StoreError> {
        self.playlists
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::UnknownPlaylist(name.to_string()))
    }

    /// Create an empty playlist. The name must be non-blank and free.
    pub fn create(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if self.playlists.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        self.playlists.insert(name.to_string(), Vec::new());
        self.save()
    }

    /// Rename a playlist, keeping its tracks. The new name must be free.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let new = new.trim();
        if !self.playlists.contains_key(old) {
            return Err(StoreError::UnknownPlaylist(old.to_string()));
        }
        if new.is_empty() {
            return Err(StoreError::InvalidName(new.to_string()));
        }
        if new != old && self.playlists.contains_key(new) {
            return Err(StoreError::DuplicateName(new.to_string()));
        }
        if new == old {
            return Ok(());
        }
        let tracks = self.playlists.remove(old).unwrap_or_default();
        self.playlists.insert(new.to_string(), tracks);
        self.save()
    }

    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        if self.playlists.remove(name).is_none() {
            return Err(StoreError::UnknownPlaylist(name.to_string()));
        }
        self.save()
    }

    /// Append a track, de-duplicating by identity key. Returns whether it
    /// was actually added.
    pub fn add_track(&mut self, name: &str, track: Track) -> Result<bool, StoreError> {
        let tracks = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownPlaylist(name.to_string()))?;
        if tracks.iter().any(|t| t.same_identity(&track)) {
            log::debug!("playlists: '{}' already in '{name}', skipping", track.title);
            return Ok(false);
        }
        tracks.push(track);
        self.save()?;
        Ok(true)
    }

    pub fn remove_track_at(&mut self, name: &str, index: usize) -> Result<Track, StoreError> {
        let tracks = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownPlaylist(name.to_string()))?;
        if index >= tracks.len() {
            return Err(StoreError::BadIndex(index));
        }
        let removed = tracks.remove(index);
        self.save()?;
        Ok(removed)
    }

    /// Swap the track at `index` with the one above it. Index 0 reports
    /// `BadIndex` (already at the top).
    pub fn move_track_up(&mut self, name: &str, index: usize) -> Result<(), StoreError> {
        let tracks = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownPlaylist(name.to_string()))?;
        if index == 0 || index >= tracks.len() {
            return Err(StoreError::BadIndex(index));
        }
        tracks.swap(index, index - 1);
        self.save()
    }

    /// A shuffled copy of a playlist's tracks, for "shuffle and play". The
    /// stored order is untouched.
    pub fn shuffled(&self, name: &str) -> Result<Vec<Track>, StoreError> {
        let mut tracks = self.tracks(name)?.to_vec();
        tracks.shuffle(&mut thread_rng());
        Ok(tracks)
    }

    fn save(&self) -> Result<(), StoreError> {
        storage::save_json(&self.path, &self.playlists)
    }
}
