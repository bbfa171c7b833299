use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::*;
use crate::track::{Track, TrackSource};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Resume,
    Stop,
    SetVolume(f32),
    SetPosition(f32),
}

type CallLog = Arc<Mutex<Vec<Call>>>;

/// Records every backend call; loads fail for locators in `fail_loads`.
struct MockBackend {
    calls: CallLog,
    fail_loads: Arc<Mutex<HashSet<String>>>,
    playing: bool,
    finished: Arc<AtomicBool>,
}

impl MockBackend {
    fn new() -> (Self, CallLog, Arc<Mutex<HashSet<String>>>, Arc<AtomicBool>) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let fail_loads = Arc::new(Mutex::new(HashSet::new()));
        let finished = Arc::new(AtomicBool::new(false));
        let backend = Self {
            calls: calls.clone(),
            fail_loads: fail_loads.clone(),
            playing: false,
            finished: finished.clone(),
        };
        (backend, calls, fail_loads, finished)
    }
}

impl AudioBackend for MockBackend {
    fn load(&mut self, track: &Track) -> Result<(), LoadError> {
        if self.fail_loads.lock().unwrap().contains(&track.locator) {
            return Err(LoadError::FileMissing(track.locator.clone()));
        }
        self.calls.lock().unwrap().push(Call::Load(track.locator.clone()));
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
        self.calls.lock().unwrap().push(Call::Play);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn resume(&mut self) {
        self.playing = true;
        self.calls.lock().unwrap().push(Call::Resume);
    }

    fn stop(&mut self) {
        self.playing = false;
        self.calls.lock().unwrap().push(Call::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.lock().unwrap().push(Call::SetVolume(volume));
    }

    fn position(&self) -> f32 {
        0.0
    }

    fn duration_ms(&self) -> u64 {
        0
    }

    fn set_position(&mut self, position: f32) {
        self.calls.lock().unwrap().push(Call::SetPosition(position));
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn finished_flag(&self) -> Arc<AtomicBool> {
        self.finished.clone()
    }
}

fn t(id: &str) -> Track {
    Track::local(
        format!("/music/{id}.mp3"),
        Some(id.to_uppercase()),
        None,
        None,
        None,
    )
}

fn player_with(tracks: Vec<Track>) -> (Player, CallLog, Arc<AtomicBool>) {
    let (backend, calls, _fail, finished) = MockBackend::new();
    let mut player = Player::new(Box::new(backend));
    if !tracks.is_empty() {
        player.play_collection(tracks, 0).unwrap();
    }
    calls.lock().unwrap().clear();
    (player, calls, finished)
}

#[test]
fn next_with_repeat_off_reports_end_of_queue_and_pins_index() {
    let (mut player, _calls, _f) = player_with(vec![t("a"), t("b"), t("c")]);

    player.next(false).unwrap();
    player.next(false).unwrap();
    assert_eq!(player.current_index(), Some(2));

    // Third call runs past the end.
    assert!(matches!(player.next(false), Err(PlayerError::EndOfQueue)));
    assert_eq!(player.current_index(), Some(2));
    assert!(!player.is_playing());
}

#[test]
fn next_with_repeat_playlist_wraps_without_end_of_queue() {
    let tracks = vec![t("a"), t("b"), t("c")];
    let (mut player, _calls, _f) = player_with(tracks.clone());
    player.set_repeat_mode(RepeatMode::Playlist);

    for _ in 0..tracks.len() {
        player.next(false).unwrap();
    }
    assert_eq!(player.current_index(), Some(0));
    assert!(player.is_playing());
}

#[test]
fn auto_advance_with_repeat_track_replays_same_track() {
    let (mut player, calls, _f) = player_with(vec![t("a"), t("b")]);
    player.set_repeat_mode(RepeatMode::Track);

    player.next(true).unwrap();
    assert_eq!(player.current_index(), Some(0));

    let calls = calls.lock().unwrap();
    assert!(calls.contains(&Call::Load("/music/a.mp3".into())));
    assert!(calls.contains(&Call::Play));
}

#[test]
fn manual_next_advances_even_in_repeat_track() {
    let (mut player, _calls, _f) = player_with(vec![t("a"), t("b")]);
    player.set_repeat_mode(RepeatMode::Track);

    player.next(false).unwrap();
    assert_eq!(player.current_index(), Some(1));
}

#[test]
fn previous_at_first_track_reports_boundary_and_changes_nothing() {
    let (mut player, calls, _f) = player_with(vec![t("a"), t("b")]);

    assert!(matches!(player.previous(), Err(PlayerError::BoundaryReached)));
    assert_eq!(player.current_index(), Some(0));
    assert!(calls.lock().unwrap().is_empty());

    player.next(false).unwrap();
    player.previous().unwrap();
    assert_eq!(player.current_index(), Some(0));
}

#[test]
fn shuffle_preserves_track_multiset_and_current_identity() {
    let tracks: Vec<Track> = (0..10).map(|i| t(&format!("t{i}"))).collect();
    let (mut player, _calls, _f) = player_with(tracks.clone());
    player.play_queue_index(4).unwrap();
    let playing_before = player.current_track().unwrap().clone();

    player.shuffle().unwrap();

    let mut before: Vec<String> = tracks.iter().map(|x| x.locator.clone()).collect();
    let mut after: Vec<String> = player.queue().iter().map(|x| x.locator.clone()).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);

    assert!(player.current_track().unwrap().same_identity(&playing_before));
}

#[test]
fn shuffle_on_empty_queue_is_rejected() {
    let (mut player, _calls, _f) = player_with(vec![]);
    assert!(matches!(player.shuffle(), Err(PlayerError::InvalidCommand(_))));
}

#[test]
fn play_queue_index_on_empty_queue_makes_no_backend_calls() {
    let (mut player, calls, _f) = player_with(vec![]);

    assert!(matches!(
        player.play_queue_index(0),
        Err(PlayerError::InvalidCommand(_))
    ));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn play_collection_rejects_empty_input_and_clamps_start() {
    let (mut player, _calls, _f) = player_with(vec![]);
    assert!(matches!(
        player.play_collection(Vec::new(), 0),
        Err(PlayerError::InvalidCommand(_))
    ));

    player.play_collection(vec![t("a"), t("b")], 99).unwrap();
    assert_eq!(player.current_index(), Some(1));
}

#[test]
fn single_track_repeat_track_reloads_on_tick() {
    let (mut player, calls, finished) = player_with(vec![t("a")]);
    player.set_repeat_mode(RepeatMode::Track);

    finished.store(true, Ordering::SeqCst);
    assert!(player.tick().unwrap());
    assert_eq!(player.current_index(), Some(0));
    assert!(player.is_playing());

    let calls = calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            Call::Load("/music/a.mp3".into()),
            Call::SetVolume(0.7),
            Call::Play
        ]
    );
}

#[test]
fn tick_without_pending_completion_does_nothing() {
    let (mut player, calls, _f) = player_with(vec![t("a")]);
    assert!(!player.tick().unwrap());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn tick_at_queue_end_surfaces_end_of_queue() {
    let (mut player, _calls, finished) = player_with(vec![t("a")]);

    finished.store(true, Ordering::SeqCst);
    assert!(matches!(player.tick(), Err(PlayerError::EndOfQueue)));
    assert!(!player.is_playing());
    // The flag was drained; the next tick is quiet.
    assert!(!player.tick().unwrap());
}

#[test]
fn load_failure_leaves_queue_and_index_unchanged() {
    let (backend, calls, fail, _finished) = MockBackend::new();
    let mut player = Player::new(Box::new(backend));
    player.play_collection(vec![t("a"), t("bad"), t("c")], 0).unwrap();

    fail.lock().unwrap().insert("/music/bad.mp3".to_string());
    calls.lock().unwrap().clear();

    assert!(matches!(player.next(false), Err(PlayerError::Load(_))));
    assert_eq!(player.current_index(), Some(0));
    assert!(!player.is_playing());
    assert!(calls.lock().unwrap().is_empty());

    // Controller stays usable: skip over the broken one directly.
    player.play_queue_index(2).unwrap();
    assert_eq!(player.current_index(), Some(2));
    assert!(player.is_playing());
}

#[test]
fn volume_is_clamped_and_reapplied_after_load() {
    let (mut player, calls, _f) = player_with(vec![t("a"), t("b")]);

    player.set_volume(1.7);
    assert_eq!(player.volume(), 1.0);
    player.set_volume(-0.3);
    assert_eq!(player.volume(), 0.0);

    calls.lock().unwrap().clear();
    player.next(false).unwrap();
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            Call::Load("/music/b.mp3".into()),
            Call::SetVolume(0.0),
            Call::Play
        ]
    );
}

#[test]
fn pause_and_resume_follow_backend_transport_state() {
    let (mut player, calls, _f) = player_with(vec![t("a")]);

    player.pause();
    assert!(!player.is_playing());
    player.resume();
    assert!(player.is_playing());

    let calls = calls.lock().unwrap();
    assert_eq!(*calls, vec![Call::Pause, Call::Resume]);
}

#[test]
fn resume_with_nothing_loaded_is_a_no_op() {
    let (mut player, calls, _f) = player_with(vec![]);
    player.resume();
    assert!(!player.is_playing());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn seek_requires_loaded_track_and_clamps() {
    let (mut player, calls, _f) = player_with(vec![]);
    assert!(matches!(player.seek(0.5), Err(PlayerError::InvalidCommand(_))));

    player.play_collection(vec![t("a")], 0).unwrap();
    player.seek(7.0).unwrap();
    assert_eq!(*calls.lock().unwrap().last().unwrap(), Call::SetPosition(1.0));
}

#[test]
fn repeat_mode_cycles_off_playlist_track() {
    let (mut player, _calls, _f) = player_with(vec![t("a")]);
    assert_eq!(player.repeat_mode(), RepeatMode::Off);
    assert_eq!(player.cycle_repeat_mode(), RepeatMode::Playlist);
    assert_eq!(player.cycle_repeat_mode(), RepeatMode::Track);
    assert_eq!(player.cycle_repeat_mode(), RepeatMode::Off);
}

#[test]
fn play_single_replaces_the_whole_queue() {
    let (mut player, _calls, _f) = player_with(vec![t("a"), t("b"), t("c")]);
    player.play_single(t("solo")).unwrap();
    assert_eq!(player.queue().len(), 1);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.current_track().unwrap().locator, "/music/solo.mp3");
}
