//! Locator resolution: turn a track's locator into media the sink can
//! decode. Local paths are existence-checked; YouTube ids go through yt-dlp
//! for a direct audio URL which is then fetched into memory. Spotify has no
//! full-track transport, so those tracks are rejected up front.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use youtube_dl::{YoutubeDl, YoutubeDlOutput};

use crate::track::{Track, TrackSource};

use super::error::LoadError;

/// Decodable media produced by resolution.
pub(super) enum Media {
    File(PathBuf),
    /// Remote audio fetched in full; kept so seeking can rebuild the
    /// decoder without another network round trip.
    Bytes(Vec<u8>),
}

pub(super) fn resolve(
    track: &Track,
    resolve_timeout: Duration,
    fetch_timeout: Duration,
) -> Result<Media, LoadError> {
    match track.source {
        TrackSource::Local => {
            let path = Path::new(&track.locator);
            if !path.is_file() {
                return Err(LoadError::FileMissing(track.locator.clone()));
            }
            Ok(Media::File(path.to_path_buf()))
        }
        TrackSource::Youtube => {
            let url = stream_url(&track.locator, resolve_timeout)?;
            log::info!("resolve: fetching audio stream for '{}'", track.title);
            Ok(Media::Bytes(fetch(&url, &track.locator, fetch_timeout)?))
        }
        TrackSource::Spotify => Err(LoadError::UnsupportedSource(TrackSource::Spotify)),
    }
}

/// Ask yt-dlp for the best direct audio URL of a YouTube video.
fn stream_url(video_id: &str, timeout: Duration) -> Result<String, LoadError> {
    let resolve_err = |reason: String| LoadError::Resolve {
        locator: video_id.to_string(),
        reason,
    };

    let output = YoutubeDl::new(format!("https://www.youtube.com/watch?v={video_id}"))
        .socket_timeout(timeout.as_secs().to_string())
        .format("bestaudio/best")
        .run()
        .map_err(|e| resolve_err(e.to_string()))?;

    let video = match output {
        YoutubeDlOutput::SingleVideo(video) => video,
        YoutubeDlOutput::Playlist(_) => {
            return Err(resolve_err("locator resolved to a playlist".to_string()));
        }
    };

    // Prefer the best audio-bearing format, mirroring bestaudio selection.
    let best_audio = video.formats.as_deref().and_then(|formats| {
        formats
            .iter()
            .filter(|f| f.acodec.as_deref().is_some_and(|c| c != "none"))
            .filter(|f| f.url.is_some())
            .max_by(|a, b| {
                a.abr
                    .unwrap_or(0.0)
                    .partial_cmp(&b.abr.unwrap_or(0.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .and_then(|f| f.url.clone())
    });

    best_audio
        .or(video.url)
        .ok_or_else(|| resolve_err("no audio format in extractor output".to_string()))
}

/// Download the resolved stream into memory, bounded by `timeout`.
fn fetch(url: &str, locator: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();

    let response = agent.get(url).call().map_err(|e| LoadError::Resolve {
        locator: locator.to_string(),
        reason: format!("stream fetch failed: {e}"),
    })?;

    let mut bytes = Vec::new();
    response
        .into_body()
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| LoadError::Resolve {
            locator: locator.to_string(),
            reason: format!("stream read failed: {e}"),
        })?;
    log::debug!("resolve: fetched {} bytes for {locator}", bytes.len());
    Ok(bytes)
}
