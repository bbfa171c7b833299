use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Where a track's audio comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Local,
    Youtube,
    Spotify,
}

/// One playable item. Immutable once created.
///
/// The stored JSON shape keeps the historical field names: local tracks
/// carry their locator under `file_path`, remote ones under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrackWire", into = "TrackWire")]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub source: TrackSource,
    /// File path (local) or provider id (youtube/spotify).
    pub locator: String,
    pub album_art: Option<String>,
    pub duration_ms: Option<u64>,
    pub popularity: Option<u8>,
}

impl Track {
    /// Build a local track from tag fields, defaulting the unknowns.
    pub fn local(
        path: impl Into<String>,
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        duration_ms: Option<u64>,
    ) -> Self {
        Self {
            title: or_unknown(title, UNKNOWN_TITLE),
            artist: or_unknown(artist, UNKNOWN_ARTIST),
            album: or_unknown(album, UNKNOWN_ALBUM),
            source: TrackSource::Local,
            locator: path.into(),
            album_art: None,
            duration_ms,
            popularity: None,
        }
    }

    /// Build a remote track from provider fields, defaulting the unknowns.
    pub fn remote(
        source: TrackSource,
        id: impl Into<String>,
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
    ) -> Self {
        Self {
            title: or_unknown(title, UNKNOWN_TITLE),
            artist: or_unknown(artist, UNKNOWN_ARTIST),
            album: or_unknown(album, UNKNOWN_ALBUM),
            source,
            locator: id.into(),
            album_art: None,
            duration_ms: None,
            popularity: None,
        }
    }

    /// Identity key used for de-duplication: the locator, scoped by source.
    pub fn identity(&self) -> (TrackSource, &str) {
        (self.source, &self.locator)
    }

    /// True when both tracks name the same underlying item.
    pub fn same_identity(&self, other: &Track) -> bool {
        self.identity() == other.identity()
    }
}

fn or_unknown(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

/// Storage/wire representation. `id` and `file_path` are both accepted on
/// read; exactly one is written depending on the source.
#[derive(Serialize, Deserialize)]
struct TrackWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    #[serde(default = "default_source")]
    source: TrackSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album_art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    popularity: Option<u8>,
}

fn default_source() -> TrackSource {
    TrackSource::Local
}

impl From<TrackWire> for Track {
    fn from(w: TrackWire) -> Self {
        let locator = match w.source {
            TrackSource::Local => w.file_path.or(w.id),
            TrackSource::Youtube | TrackSource::Spotify => w.id.or(w.file_path),
        }
        .unwrap_or_default();

        Self {
            title: or_unknown(w.title, UNKNOWN_TITLE),
            artist: or_unknown(w.artist, UNKNOWN_ARTIST),
            album: or_unknown(w.album, UNKNOWN_ALBUM),
            source: w.source,
            locator,
            album_art: w.album_art,
            duration_ms: w.duration,
            popularity: w.popularity,
        }
    }
}

impl From<Track> for TrackWire {
    fn from(t: Track) -> Self {
        let (id, file_path) = match t.source {
            TrackSource::Local => (None, Some(t.locator)),
            TrackSource::Youtube | TrackSource::Spotify => (Some(t.locator), None),
        };

        Self {
            title: Some(t.title),
            artist: Some(t.artist),
            album: Some(t.album),
            source: t.source,
            id,
            file_path,
            album_art: t.album_art,
            duration: t.duration_ms,
            popularity: t.popularity,
        }
    }
}
