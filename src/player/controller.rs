use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::track::Track;

use super::backend::AudioBackend;
use super::error::PlayerError;
use super::types::RepeatMode;

/// The playback queue controller.
///
/// Owns the ordered queue, the current-track pointer and the repeat policy.
/// All commands run on the caller's thread; the only asynchronous input is
/// the backend's finished flag, drained by `tick`.
pub struct Player {
    backend: Box<dyn AudioBackend>,
    tracks: Vec<Track>,
    current: usize,
    repeat: RepeatMode,
    playing: bool,
    loaded: bool,
    volume: f32,
    finished: Arc<AtomicBool>,
}

impl Player {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        let finished = backend.finished_flag();
        Self {
            backend,
            tracks: Vec::new(),
            current: 0,
            repeat: RepeatMode::default(),
            playing: false,
            loaded: false,
            volume: 0.7,
            finished,
        }
    }

    pub fn queue(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the current track, or `None` while the queue is empty.
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() { None } else { Some(self.current) }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Current position as a fraction, straight from the backend.
    pub fn position(&self) -> f32 {
        self.backend.position()
    }

    pub fn duration_ms(&self) -> u64 {
        self.backend.duration_ms()
    }

    /// Replace the queue with a single track and play it.
    pub fn play_single(&mut self, track: Track) -> Result<(), PlayerError> {
        self.play_collection(vec![track], 0)
    }

    /// Replace the queue with `tracks`, starting at `start` (clamped).
    pub fn play_collection(
        &mut self,
        tracks: Vec<Track>,
        start: usize,
    ) -> Result<(), PlayerError> {
        if tracks.is_empty() {
            return Err(PlayerError::InvalidCommand("nothing to play"));
        }
        self.tracks = tracks;
        self.current = start.min(self.tracks.len() - 1);
        self.start(self.current)
    }

    /// Jump to a specific queue position.
    pub fn play_queue_index(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.tracks.len() {
            return Err(PlayerError::InvalidCommand("invalid queue index"));
        }
        self.start(index)
    }

    /// Advance per the repeat policy. `auto_advance` marks a natural
    /// end-of-track; manual skips always move on even in track-repeat.
    pub fn next(&mut self, auto_advance: bool) -> Result<(), PlayerError> {
        if self.tracks.is_empty() {
            return Err(PlayerError::InvalidCommand("queue is empty"));
        }
        if self.repeat == RepeatMode::Track && auto_advance {
            return self.start(self.current);
        }
        if self.current + 1 < self.tracks.len() {
            return self.start(self.current + 1);
        }
        if self.repeat == RepeatMode::Playlist {
            return self.start(0);
        }

        self.backend.stop();
        self.playing = false;
        self.loaded = false;
        log::debug!("player: end of queue at index {}", self.current);
        Err(PlayerError::EndOfQueue)
    }

    /// Step back one track. Does not wrap.
    pub fn previous(&mut self) -> Result<(), PlayerError> {
        if self.tracks.is_empty() {
            return Err(PlayerError::InvalidCommand("queue is empty"));
        }
        if self.current == 0 {
            return Err(PlayerError::BoundaryReached);
        }
        self.start(self.current - 1)
    }

    pub fn pause(&mut self) {
        if self.backend.is_playing() {
            self.backend.pause();
        }
        self.playing = false;
    }

    /// Continue from the current position. Distinct from `play_*`, which
    /// (re)loads from scratch. No-op with nothing loaded.
    pub fn resume(&mut self) {
        if self.loaded && !self.backend.is_playing() {
            self.backend.resume();
            self.playing = true;
        }
    }

    /// Uniformly permute the queue, keeping the currently playing track
    /// current (first identity match in the new order; 0 if absent).
    pub fn shuffle(&mut self) -> Result<(), PlayerError> {
        if self.tracks.is_empty() {
            return Err(PlayerError::InvalidCommand("queue is empty"));
        }
        let playing_now = self.tracks[self.current].clone();
        self.tracks.shuffle(&mut thread_rng());
        self.current = self
            .tracks
            .iter()
            .position(|t| t.same_identity(&playing_now))
            .unwrap_or(0);
        Ok(())
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Off -> Playlist -> Track -> Off.
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycled();
        self.repeat
    }

    /// Seek to a fraction of the current track. Clamped; rejected while
    /// nothing is loaded.
    pub fn seek(&mut self, fraction: f32) -> Result<(), PlayerError> {
        if !self.loaded {
            return Err(PlayerError::InvalidCommand("nothing is loaded"));
        }
        self.backend.set_position(fraction.clamp(0.0, 1.0));
        Ok(())
    }

    /// Set and remember the volume. The stored value is re-applied after
    /// every load since a backend may reset volume on new media.
    pub fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    /// Drain the backend's natural-completion signal. Call once per host
    /// refresh cycle; runs at most one transition. Returns whether a
    /// completion was consumed.
    pub fn tick(&mut self) -> Result<bool, PlayerError> {
        if self.finished.swap(false, Ordering::SeqCst) {
            self.playing = false;
            self.next(true)?;
            return Ok(true);
        }
        // Keep our flag in line with the backend's transport state.
        if self.playing && !self.backend.is_playing() {
            self.playing = false;
        }
        Ok(false)
    }

    /// Load and play the track at `index`. On failure the queue and index
    /// are left untouched and playback is off.
    fn start(&mut self, index: usize) -> Result<(), PlayerError> {
        let track = &self.tracks[index];
        log::debug!("player: starting [{index}] '{}'", track.title);
        if let Err(e) = self.backend.load(track) {
            self.playing = false;
            self.loaded = false;
            log::warn!("player: load failed for '{}': {e}", track.title);
            return Err(e.into());
        }
        // Volume may have been reset by the load.
        self.backend.set_volume(self.volume);
        self.backend.play();
        self.current = index;
        self.playing = true;
        self.loaded = true;
        Ok(())
    }
}
