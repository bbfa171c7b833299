//! Named playlists, persisted as one JSON document mapping playlist name to
//! its ordered track list.
//!
//! A playlist has no current-index concept; "playing a playlist" means the
//! host copies its tracks into the player's queue.

mod store;

pub use store::*;
