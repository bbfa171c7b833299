//! Spotify catalogue search via the Web API.
//!
//! Uses the client-credentials flow: an app id/secret pair is exchanged for
//! a bearer token, which is cached and refreshed once on a 401.

use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use super::provider::{SearchError, SearchProvider};
use crate::config::SearchSettings;
use crate::track::{Track, TrackSource};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

pub struct SpotifyClient {
    credentials: Option<(String, String)>,
    agent: ureq::Agent,
    token: Mutex<Option<String>>,
    limit: u32,
}

impl SpotifyClient {
    pub fn new(settings: &SearchSettings) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.http_timeout_secs)))
            .build()
            .into();
        Self {
            credentials: settings.spotify_credentials(),
            agent,
            token: Mutex::new(None),
            limit: settings.result_limit,
        }
    }

    /// Returns the cached bearer token, requesting a fresh one when there is
    /// none yet or `refresh` forces it.
    fn token(&self, refresh: bool) -> Result<String, SearchError> {
        let mut cached = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if !refresh
            && let Some(token) = cached.as_ref()
        {
            return Ok(token.clone());
        }
        let token = self.request_token()?;
        *cached = Some(token.clone());
        Ok(token)
    }

    fn request_token(&self) -> Result<String, SearchError> {
        let (id, secret) = self
            .credentials
            .as_ref()
            .ok_or(SearchError::ProviderUnavailable("spotify"))?;
        let basic = STANDARD.encode(format!("{id}:{secret}"));
        let mut response = self
            .agent
            .post(TOKEN_URL)
            .header("Authorization", &format!("Basic {basic}"))
            .send_form([("grant_type", "client_credentials")])
            .map_err(|e| SearchError::Request(e.to_string()))?;
        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        body["access_token"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| SearchError::Parse("token response missing access_token".into()))
    }

    fn call_search(&self, query: &str, token: &str) -> Result<Value, ureq::Error> {
        let mut response = self
            .agent
            .get(SEARCH_URL)
            .query("q", query)
            .query("type", "track")
            .query("limit", &self.limit.to_string())
            .query("market", "US")
            .header("Authorization", &format!("Bearer {token}"))
            .call()?;
        response.body_mut().read_json()
    }
}

impl SearchProvider for SpotifyClient {
    fn name(&self) -> &'static str {
        "spotify"
    }

    fn available(&self) -> bool {
        self.credentials.is_some()
    }

    fn search(&self, query: &str) -> Result<Vec<Track>, SearchError> {
        let token = self.token(false)?;
        let body = match self.call_search(query, &token) {
            Ok(body) => body,
            // Cached token expired, refresh once and retry.
            Err(ureq::Error::StatusCode(401)) => {
                log::debug!("spotify token rejected, requesting a new one");
                let token = self.token(true)?;
                self.call_search(query, &token)
                    .map_err(|e| SearchError::Request(e.to_string()))?
            }
            Err(e) => return Err(SearchError::Request(e.to_string())),
        };
        Ok(parse_search_response(&body))
    }
}

/// Reshapes a `/v1/search` response into tracks. Items without an id are
/// dropped rather than failing the whole page.
pub(super) fn parse_search_response(body: &Value) -> Vec<Track> {
    let Some(items) = body["tracks"]["items"].as_array() else {
        return Vec::new();
    };
    items.iter().filter_map(parse_item).collect()
}

fn parse_item(item: &Value) -> Option<Track> {
    let id = item["id"].as_str()?;
    let title = item["name"].as_str().map(str::to_owned);
    let artist = item["artists"].as_array().map(|artists| {
        artists
            .iter()
            .filter_map(|a| a["name"].as_str())
            .collect::<Vec<_>>()
            .join(", ")
    });
    let album = item["album"]["name"].as_str().map(str::to_owned);

    let mut track = Track::remote(TrackSource::Spotify, id, title, artist, album);
    track.album_art = item["album"]["images"][0]["url"].as_str().map(str::to_owned);
    track.duration_ms = item["duration_ms"].as_u64();
    track.popularity = item["popularity"].as_u64().map(|p| p.min(100) as u8);
    Some(track)
}
