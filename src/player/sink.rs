//! Rodio-backed `AudioBackend`.
//!
//! One output stream for the life of the backend; each loaded track gets a
//! fresh sink. Seeking rebuilds the sink with `skip_duration`, and elapsed
//! time is tracked with a start instant plus accumulated pause time, since
//! rodio reports nothing usable across formats. A watcher thread per sink
//! polls for drain and raises the shared finished flag exactly once.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::PlaybackSettings;
use crate::track::Track;

use super::backend::AudioBackend;
use super::error::LoadError;
use super::resolve::{self, Media};

const WATCH_INTERVAL: Duration = Duration::from_millis(200);

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Arc<Sink>>,
    media: Option<Media>,
    duration: Option<Duration>,
    volume: f32,
    paused: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    finished: Arc<AtomicBool>,
    // Bumped whenever the current sink is replaced or stopped, so stale
    // watcher threads exit without raising the finished flag.
    generation: Arc<AtomicU64>,
    resolve_timeout: Duration,
    fetch_timeout: Duration,
}

impl RodioBackend {
    pub fn new(settings: &PlaybackSettings) -> Result<Self, LoadError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| LoadError::Backend(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when OutputStream is dropped; noisy for hosts.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            media: None,
            duration: None,
            volume: settings.volume,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            finished: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            resolve_timeout: Duration::from_secs(settings.resolve_timeout_secs),
            fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
        })
    }

    /// Drop the current sink without firing the finished flag.
    fn clear_sink(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
    }

    /// Build a paused sink for the loaded media, skipped to `start_at`.
    /// Returns the decoder-reported total duration when available.
    fn build_sink(&mut self, start_at: Duration) -> Result<Option<Duration>, LoadError> {
        let media = self
            .media
            .as_ref()
            .ok_or_else(|| LoadError::Backend("no media loaded".to_string()))?;

        let sink = Sink::connect_new(self.stream.mixer());
        let total = match media {
            Media::File(path) => {
                let file = File::open(path)
                    .map_err(|e| LoadError::Backend(format!("open {}: {e}", path.display())))?;
                let source = Decoder::new(BufReader::new(file))
                    .map_err(|e| LoadError::Backend(format!("decode {}: {e}", path.display())))?;
                let total = source.total_duration();
                sink.append(source.skip_duration(start_at));
                total
            }
            Media::Bytes(bytes) => {
                let source = Decoder::new(Cursor::new(bytes.clone()))
                    .map_err(|e| LoadError::Backend(format!("decode stream: {e}")))?;
                let total = source.total_duration();
                sink.append(source.skip_duration(start_at));
                total
            }
        };
        sink.pause();
        sink.set_volume(self.volume);

        let sink = Arc::new(sink);
        self.spawn_watcher(&sink);
        self.sink = Some(sink);
        self.paused = true;
        self.started_at = None;
        self.accumulated = start_at;
        Ok(total)
    }

    fn spawn_watcher(&self, sink: &Arc<Sink>) {
        let weak: Weak<Sink> = Arc::downgrade(sink);
        let my_generation = self.generation.load(Ordering::SeqCst);
        let generation = self.generation.clone();
        let finished = self.finished.clone();

        thread::spawn(move || {
            loop {
                thread::sleep(WATCH_INTERVAL);
                if generation.load(Ordering::SeqCst) != my_generation {
                    return;
                }
                let Some(sink) = weak.upgrade() else { return };
                if sink.empty() && !sink.is_paused() {
                    finished.store(true, Ordering::SeqCst);
                    return;
                }
            }
        });
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, track: &Track) -> Result<(), LoadError> {
        let media = resolve::resolve(track, self.resolve_timeout, self.fetch_timeout)?;
        self.clear_sink();
        self.media = Some(media);

        let detected = self.build_sink(Duration::ZERO).inspect_err(|_| {
            self.media = None;
            self.duration = None;
        })?;
        self.duration = detected.or(track.duration_ms.map(Duration::from_millis));
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
            if let Some(t) = self.started_at.take() {
                self.accumulated += t.elapsed();
            }
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
            self.paused = false;
            if self.started_at.is_none() {
                self.started_at = Some(Instant::now());
            }
        }
    }

    fn stop(&mut self) {
        self.clear_sink();
        self.media = None;
        self.duration = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = &self.sink {
            s.set_volume(self.volume);
        }
    }

    fn position(&self) -> f32 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.elapsed().as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn duration_ms(&self) -> u64 {
        self.duration.map(|d| d.as_millis() as u64).unwrap_or(0)
    }

    fn set_position(&mut self, position: f32) {
        let Some(total) = self.duration else { return };
        if self.media.is_none() {
            return;
        }
        let was_paused = self.paused;
        let target = total.mul_f32(position.clamp(0.0, 1.0));

        self.clear_sink();
        match self.build_sink(target) {
            Ok(_) => {
                if !was_paused {
                    self.play();
                }
            }
            Err(e) => log::warn!("seek rebuild failed: {e}"),
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn finished_flag(&self) -> Arc<AtomicBool> {
        self.finished.clone()
    }
}
