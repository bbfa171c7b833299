//! Playback queue controller and audio backend.
//!
//! `Player` owns the queue, the current-track pointer and the repeat policy,
//! and translates playback intents into calls on an `AudioBackend`. The
//! backend's end-of-track signal is a shared atomic flag set from the audio
//! thread; the host drains it by calling `Player::tick` on its own refresh
//! cycle, so all queue mutation stays on the caller's thread.

mod backend;
mod controller;
mod error;
mod resolve;
mod sink;
mod types;

pub use backend::AudioBackend;
pub use controller::Player;
pub use error::{LoadError, PlayerError};
pub use sink::RodioBackend;
pub use types::RepeatMode;

#[cfg(test)]
mod tests;
