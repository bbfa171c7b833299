use std::io;
use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use walkdir::WalkDir;

use crate::storage::StoreError;
use crate::track::Track;

use super::store::Library;

/// Build a `Track` for a local audio file, reading tags when possible and
/// falling back to the file stem as title.
pub fn track_from_path(path: &Path) -> Track {
    let mut title: Option<String> = None;
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration_ms: Option<u64> = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration_ms = Some(tagged.properties().duration().as_millis() as u64);

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                if !v.trim().is_empty() {
                    title = Some(v.to_string());
                }
            }
            if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                let v = v.trim();
                if !v.is_empty() {
                    artist = Some(v.to_string());
                }
            }
            if let Some(v) = tag.get_string(ItemKey::AlbumTitle) {
                let v = v.trim();
                if !v.is_empty() {
                    album = Some(v.to_string());
                }
            }
        }
    }

    if title.is_none() {
        title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());
    }

    Track::local(
        path.to_string_lossy().into_owned(),
        title,
        artist,
        album,
        duration_ms,
    )
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions
                .iter()
                .any(|e| e.trim().trim_start_matches('.').to_ascii_lowercase() == ext)
        })
        .unwrap_or(false)
}

impl Library {
    /// Import one local file into the library. Returns whether it was added
    /// (false: already present by identity).
    pub fn import_file(&mut self, path: &Path) -> Result<bool, StoreError> {
        if !path.is_file() {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )));
        }
        let track = track_from_path(path);
        log::info!("library: importing '{}' from {}", track.title, path.display());
        self.add_track(track)
    }

    /// Recursively import every file under `dir` with a matching extension.
    /// Returns the number of tracks actually added.
    pub fn import_dir(&mut self, dir: &Path, extensions: &[String]) -> Result<usize, StoreError> {
        let mut added = 0;
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file() && has_extension(path, extensions) && self.import_file(path)? {
                added += 1;
            }
        }
        Ok(added)
    }
}
