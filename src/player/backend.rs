use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::track::Track;

use super::error::LoadError;

/// Capability contract for whatever actually produces sound.
///
/// `load` prepares a track without starting it (resolving remote locators to
/// a playable stream first); `play` starts the loaded media from the top,
/// `resume` continues from the current position. Positions are fractions in
/// `0.0..=1.0`.
///
/// Natural completion is signalled through the shared flag returned by
/// `finished_flag`: the backend sets it exactly once per track that plays to
/// its end (never on `stop`/`pause`), from whatever thread it owns. The
/// controller drains the flag on its own tick.
pub trait AudioBackend {
    fn load(&mut self, track: &Track) -> Result<(), LoadError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Current position as a fraction, 0.0 when nothing is loaded.
    fn position(&self) -> f32;
    /// Track length in milliseconds, 0 when unknown or nothing is loaded.
    fn duration_ms(&self) -> u64;
    fn set_position(&mut self, position: f32);
    fn is_playing(&self) -> bool;
    fn finished_flag(&self) -> Arc<AtomicBool>;
}
