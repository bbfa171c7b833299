use std::{env, path::PathBuf};

use super::schema::{SearchSettings, Settings, StorageSettings};

impl Settings {
    /// Build settings by layering an optional TOML file under `VIVACE__`
    /// environment overrides; anything neither source names keeps its
    /// struct default.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("VIVACE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Range and sanity checks that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err("playback.volume must be between 0.0 and 1.0".to_string());
        }
        if self.search.result_limit == 0 {
            return Err("search.result_limit must be >= 1".to_string());
        }
        if self.library.extensions.is_empty() {
            return Err("library.extensions must not be empty".to_string());
        }
        Ok(())
    }
}

impl StorageSettings {
    fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute path of the library JSON store.
    pub fn library_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.library_file)
    }

    /// Absolute path of the playlists JSON store.
    pub fn playlists_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.playlists_file)
    }
}

impl SearchSettings {
    /// Spotify id/secret pair, from the config or the conventional
    /// environment variables. `None` unless both halves are present.
    pub fn spotify_credentials(&self) -> Option<(String, String)> {
        let id = non_empty(self.spotify_client_id.clone())
            .or_else(|| non_empty(env::var("SPOTIFY_CLIENT_ID").ok()))?;
        let secret = non_empty(self.spotify_client_secret.clone())
            .or_else(|| non_empty(env::var("SPOTIFY_CLIENT_SECRET").ok()))?;
        Some((id, secret))
    }

    /// YouTube Data API key, from the config or `YOUTUBE_API_KEY`.
    pub fn youtube_key(&self) -> Option<String> {
        non_empty(self.youtube_api_key.clone())
            .or_else(|| non_empty(env::var("YOUTUBE_API_KEY").ok()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Where the config file lives: `VIVACE_CONFIG_PATH` when set, otherwise
/// the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("VIVACE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/vivace/config.toml`, falling back to
/// `~/.config/vivace/config.toml`. `None` only when `HOME` is unset too.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("vivace").join("config.toml"))
}

/// `$XDG_DATA_HOME/vivace`, falling back to `~/.local/share/vivace`. The
/// JSON stores land here unless `storage.data_dir` overrides it.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };

    data_home.map(|d| d.join("vivace"))
}
