/// What happens when the queue is exhausted or a track ends naturally.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    Off,
    /// Wrap around to the start of the queue.
    Playlist,
    /// Replay the current track when it ends naturally.
    Track,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

impl RepeatMode {
    /// Cycle order for a single "toggle repeat" control.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::Playlist,
            Self::Playlist => Self::Track,
            Self::Track => Self::Off,
        }
    }
}
