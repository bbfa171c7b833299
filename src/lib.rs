//! vivace: the core of a music streaming player.
//!
//! This crate owns everything except the screen: a playback queue controller
//! (`player::Player`) driving a pluggable audio backend, a JSON-persisted
//! local library and playlist store, and search clients for Spotify and
//! YouTube. A hosting UI creates these, issues commands, and polls the
//! player on its own refresh tick (`Player::tick` drains the end-of-track
//! signal from the audio thread).

pub mod config;
pub mod library;
pub mod net;
pub mod player;
pub mod playlist;
pub mod search;
pub mod storage;
pub mod track;

pub use player::{AudioBackend, LoadError, Player, PlayerError, RepeatMode};
pub use track::{Track, TrackSource};
