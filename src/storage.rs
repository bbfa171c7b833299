//! Whole-document JSON persistence shared by the library and playlist
//! stores. Every mutation rewrites the full file; there is no partial-write
//! recovery, the in-memory state stays authoritative if a write fails.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("a playlist named '{0}' already exists")]
    DuplicateName(String),
    #[error("'{0}' is not a usable playlist name")]
    InvalidName(String),
    #[error("no playlist named '{0}'")]
    UnknownPlaylist(String),
    #[error("index {0} is out of range")]
    BadIndex(usize),
}

/// Read a JSON document, or its `Default` when the file does not exist yet.
pub fn load_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Overwrite the document in full, creating parent directories on first use.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
