use std::path::PathBuf;

use serde::Deserialize;

use crate::player::RepeatMode;

/// Everything configurable, in one tree.
///
/// Loaded from `config.toml` (default location:
/// `$XDG_CONFIG_HOME/vivace/config.toml`). A `VIVACE__`-prefixed
/// environment variable beats the file for any key, with `__` separating
/// nesting levels (`VIVACE__PLAYBACK__VOLUME`); the file beats the struct
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, 0.0 to 1.0.
    pub volume: f32,
    /// Repeat mode the queue starts in.
    pub repeat_mode: RepeatModeSetting,
    /// How long to wait for a remote locator to resolve (seconds).
    pub resolve_timeout_secs: u64,
    /// How long a full audio fetch may take (seconds).
    pub fetch_timeout_secs: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            repeat_mode: RepeatModeSetting::Off,
            resolve_timeout_secs: 10,
            fetch_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-repeat", alias = "no_repeat")]
    Off,
    #[serde(alias = "all", alias = "repeat-all", alias = "repeat_all", alias = "queue")]
    Playlist,
    #[serde(alias = "one", alias = "repeat-one", alias = "repeat_one", alias = "single")]
    Track,
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(setting: RepeatModeSetting) -> Self {
        match setting {
            RepeatModeSetting::Off => RepeatMode::Off,
            RepeatModeSetting::Playlist => RepeatMode::Playlist,
            RepeatModeSetting::Track => RepeatMode::Track,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the JSON stores live. Defaults to the XDG data dir.
    pub data_dir: Option<PathBuf>,
    /// Library store file name inside `data_dir`.
    pub library_file: String,
    /// Playlists store file name inside `data_dir`.
    pub playlists_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            library_file: "library.json".to_string(),
            playlists_file: "playlists.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "flac".into(),
                "ogg".into(),
                "m4a".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Spotify app credentials. `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`
    /// are consulted when these are unset.
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// YouTube Data API key; `YOUTUBE_API_KEY` is consulted when unset.
    /// Without one, search falls back to yt-dlp.
    pub youtube_api_key: Option<String>,
    /// Maximum results requested per provider.
    pub result_limit: u32,
    /// Timeout for search HTTP requests (seconds).
    pub http_timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            spotify_client_id: None,
            spotify_client_secret: None,
            youtube_api_key: None,
            result_limit: 20,
            http_timeout_secs: 10,
        }
    }
}
