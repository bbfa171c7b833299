//! Local music library: a JSON-persisted, de-duplicated track list with
//! derived artist/album groupings and local file import.
//!
//! The library knows nothing about playback. The host reads tracks (or a
//! grouping) out of it and hands them to `player::Player::play_collection`.

mod import;
mod store;

pub use import::track_from_path;
pub use store::*;
