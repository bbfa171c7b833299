//! YouTube search, via the Data API when a key is configured and yt-dlp
//! otherwise.
//!
//! Video titles rarely carry clean metadata, so "Artist - Title" style
//! patterns are split out of the raw title; the channel name stands in for
//! the artist when no pattern matches.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use youtube_dl::{SearchOptions, SingleVideo, YoutubeDl, YoutubeDlOutput};

use super::provider::{SearchError, SearchProvider};
use crate::config::SearchSettings;
use crate::track::{Track, TrackSource};

const API_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

pub struct YouTubeClient {
    api_key: Option<String>,
    agent: ureq::Agent,
    limit: u32,
}

impl YouTubeClient {
    pub fn new(settings: &SearchSettings) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.http_timeout_secs)))
            .build()
            .into();
        Self {
            api_key: settings.youtube_key(),
            agent,
            limit: settings.result_limit,
        }
    }

    fn search_api(&self, query: &str, key: &str) -> Result<Vec<Track>, SearchError> {
        let mut response = self
            .agent
            .get(API_SEARCH_URL)
            .query("part", "snippet")
            .query("q", &format!("{query} music"))
            .query("type", "video")
            .query("maxResults", &self.limit.to_string())
            .query("order", "relevance")
            // Music category only.
            .query("videoCategoryId", "10")
            .query("key", key)
            .call()
            .map_err(|e| SearchError::Request(e.to_string()))?;
        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(parse_api_response(&body))
    }

    fn search_ytdlp(&self, query: &str) -> Result<Vec<Track>, SearchError> {
        let options =
            SearchOptions::youtube(format!("{query} music")).with_count(self.limit as usize);
        let output = YoutubeDl::search_for(&options)
            .extra_arg("--flat-playlist")
            .run()
            .map_err(|e| SearchError::Request(e.to_string()))?;
        match output {
            YoutubeDlOutput::Playlist(playlist) => Ok(playlist
                .entries
                .unwrap_or_default()
                .iter()
                .map(video_track)
                .collect()),
            YoutubeDlOutput::SingleVideo(video) => Ok(vec![video_track(&video)]),
        }
    }
}

impl SearchProvider for YouTubeClient {
    fn name(&self) -> &'static str {
        "youtube"
    }

    // yt-dlp needs no credentials, so this provider always has a path.
    fn available(&self) -> bool {
        true
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, SearchError> {
        match self.api_key.as_deref() {
            Some(key) => self.search_api(query, key),
            None => {
                log::debug!("no youtube api key, searching through yt-dlp");
                self.search_ytdlp(query)
            }
        }
    }
}

/// Reshapes a Data API search response into tracks. Items without a video id
/// (channels, playlists) are dropped.
pub(super) fn parse_api_response(body: &Value) -> Vec<Track> {
    let Some(items) = body["items"].as_array() else {
        return Vec::new();
    };
    items.iter().filter_map(parse_api_item).collect()
}

fn parse_api_item(item: &Value) -> Option<Track> {
    let id = item["id"]["videoId"].as_str()?;
    let snippet = &item["snippet"];
    let raw_title = snippet["title"].as_str().unwrap_or_default();
    let channel = snippet["channelTitle"].as_str().map(str::to_owned);

    let (artist, title) = match parse_video_title(raw_title) {
        Some((artist, title)) => (Some(artist), Some(title)),
        None => (channel, Some(raw_title.to_owned())),
    };
    let mut track = Track::remote(TrackSource::Youtube, id, title, artist, Some("YouTube".into()));
    track.album_art = snippet["thumbnails"]["default"]["url"]
        .as_str()
        .map(str::to_owned);
    Some(track)
}

fn video_track(video: &SingleVideo) -> Track {
    let raw_title = video.title.clone().unwrap_or_default();
    let (artist, title) = match parse_video_title(&raw_title) {
        Some((artist, title)) => (Some(artist), Some(title)),
        None => (video.uploader.clone(), Some(raw_title)),
    };
    let mut track = Track::remote(
        TrackSource::Youtube,
        video.id.clone(),
        title,
        artist,
        Some("YouTube".into()),
    );
    track.album_art = video.thumbnail.clone();
    track.duration_ms = video
        .duration
        .as_ref()
        .and_then(Value::as_f64)
        .map(|secs| (secs * 1000.0) as u64);
    track
}

/// Splits a video title into `(artist, song)` using the naming conventions
/// music uploads tend to follow. Returns `None` when nothing matches.
pub(super) fn parse_video_title(title: &str) -> Option<(String, String)> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            // Artist - Title, with dash variants, trailing (...) or [...] cut
            r"^(.+?)\s*[-–—]\s*(.+?)(?:\s*\(.*\)|\s*\[.*\])?$",
            // Artist : Title or Artist | Title
            r"^(.+?)\s*[:|]\s*(.+?)(?:\s*\(.*\)|\s*\[.*\])?$",
            // Artist "Title"
            r#"^(.+?)\s*"(.+?)""#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("title pattern"))
        .collect()
    });

    let title = title.trim();
    for pattern in patterns {
        if let Some(caps) = pattern.captures(title) {
            let artist = caps[1].trim().to_string();
            let song = caps[2].trim().to_string();
            if !artist.is_empty() && !song.is_empty() {
                return Some((artist, song));
            }
        }
    }
    None
}
