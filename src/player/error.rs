use thiserror::Error;

use crate::track::TrackSource;

/// Loading a track failed. Aborts only the current load; the controller's
/// queue and index stay consistent and further commands keep working.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("local file not found: {0}")]
    FileMissing(String),
    /// Provider-specific stream resolution failed (distinct from the
    /// transport failing on an already-resolved locator).
    #[error("could not resolve a stream for '{locator}': {reason}")]
    Resolve { locator: String, reason: String },
    #[error("playback from {0:?} is not supported")]
    UnsupportedSource(TrackSource),
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Expected, reportable playback conditions. The host surfaces these as
/// status messages; none of them leaves the controller inconsistent.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("end of queue reached")]
    EndOfQueue,
    #[error("already at first track")]
    BoundaryReached,
}
