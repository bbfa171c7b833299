use serde_json::json;

use super::provider::{SearchError, SearchProvider, search_all};
use super::{spotify, youtube};
use crate::track::{Track, TrackSource};

#[test]
fn video_title_splits_artist_and_song() {
    let cases = [
        ("Daft Punk - Around the World", ("Daft Punk", "Around the World")),
        ("Boards of Canada – Roygbiv", ("Boards of Canada", "Roygbiv")),
        ("Nirvana | Lithium", ("Nirvana", "Lithium")),
        ("Queen: Don't Stop Me Now", ("Queen", "Don't Stop Me Now")),
        (r#"Bowie "Heroes""#, ("Bowie", "Heroes")),
    ];
    for (raw, (artist, song)) in cases {
        let parsed = youtube::parse_video_title(raw);
        assert_eq!(parsed, Some((artist.to_string(), song.to_string())), "{raw}");
    }
}

#[test]
fn video_title_drops_trailing_qualifier() {
    let parsed = youtube::parse_video_title("Royksopp - Eple (Official Video)");
    assert_eq!(parsed, Some(("Royksopp".into(), "Eple".into())));

    let parsed = youtube::parse_video_title("Moderat - A New Error [HD]");
    assert_eq!(parsed, Some(("Moderat".into(), "A New Error".into())));
}

#[test]
fn video_title_without_separator_is_not_split() {
    assert_eq!(youtube::parse_video_title("lofi hip hop radio"), None);
    assert_eq!(youtube::parse_video_title(""), None);
}

#[test]
fn spotify_response_reshapes_into_tracks() {
    let body = json!({
        "tracks": {
            "items": [
                {
                    "id": "3n3Ppam7vgaVa1iaRUc9Lp",
                    "name": "Mr. Brightside",
                    "artists": [{"name": "The Killers"}],
                    "album": {
                        "name": "Hot Fuss",
                        "images": [{"url": "https://i.scdn.co/image/abc"}]
                    },
                    "duration_ms": 222_973,
                    "popularity": 87
                },
                {
                    "id": "7ouMYWpwJ422jRcDASZB7P",
                    "name": "Knights of Cydonia",
                    "artists": [{"name": "Muse"}, {"name": "Orchestra"}],
                    "album": {"name": "Black Holes", "images": []}
                }
            ]
        }
    });

    let tracks = spotify::parse_search_response(&body);
    assert_eq!(tracks.len(), 2);

    let first = &tracks[0];
    assert_eq!(first.source, TrackSource::Spotify);
    assert_eq!(first.locator, "3n3Ppam7vgaVa1iaRUc9Lp");
    assert_eq!(first.title, "Mr. Brightside");
    assert_eq!(first.artist, "The Killers");
    assert_eq!(first.album, "Hot Fuss");
    assert_eq!(first.album_art.as_deref(), Some("https://i.scdn.co/image/abc"));
    assert_eq!(first.duration_ms, Some(222_973));
    assert_eq!(first.popularity, Some(87));

    // Multiple artists join, missing image stays empty.
    assert_eq!(tracks[1].artist, "Muse, Orchestra");
    assert_eq!(tracks[1].album_art, None);
}

#[test]
fn spotify_item_without_id_is_dropped() {
    let body = json!({
        "tracks": {
            "items": [
                {"name": "ghost entry"},
                {"id": "x1", "name": "kept"}
            ]
        }
    });
    let tracks = spotify::parse_search_response(&body);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].locator, "x1");
}

#[test]
fn spotify_empty_or_malformed_body_yields_nothing() {
    assert!(spotify::parse_search_response(&json!({})).is_empty());
    assert!(spotify::parse_search_response(&json!({"tracks": {"items": 4}})).is_empty());
}

#[test]
fn youtube_api_response_reshapes_into_tracks() {
    let body = json!({
        "items": [
            {
                "id": {"videoId": "dQw4w9WgXcQ"},
                "snippet": {
                    "title": "Rick Astley - Never Gonna Give You Up (Official Video)",
                    "channelTitle": "Rick Astley",
                    "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg"}}
                }
            },
            {
                "id": {"channelId": "UC123"},
                "snippet": {"title": "some channel", "channelTitle": "whoever"}
            },
            {
                "id": {"videoId": "abc123"},
                "snippet": {"title": "ambient mix for studying", "channelTitle": "Chill Beats"}
            }
        ]
    });

    let tracks = youtube::parse_api_response(&body);
    assert_eq!(tracks.len(), 2, "channel results are dropped");

    let first = &tracks[0];
    assert_eq!(first.source, TrackSource::Youtube);
    assert_eq!(first.locator, "dQw4w9WgXcQ");
    assert_eq!(first.title, "Never Gonna Give You Up");
    assert_eq!(first.artist, "Rick Astley");
    assert_eq!(first.album, "YouTube");
    assert!(first.album_art.as_deref().unwrap().contains("default.jpg"));

    // Unsplittable title keeps the channel as artist.
    assert_eq!(tracks[1].title, "ambient mix for studying");
    assert_eq!(tracks[1].artist, "Chill Beats");
}

struct StubProvider {
    name: &'static str,
    available: bool,
    outcome: Result<Vec<Track>, SearchError>,
}

impl SearchProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self) -> bool {
        self.available
    }

    fn search(&self, _query: &str) -> Result<Vec<Track>, SearchError> {
        match &self.outcome {
            Ok(tracks) => Ok(tracks.clone()),
            Err(_) => Err(SearchError::Request("boom".into())),
        }
    }
}

#[test]
fn search_all_isolates_provider_failures() {
    let hit = Track::remote(TrackSource::Spotify, "s1", Some("Song".into()), None, None);
    let providers: Vec<StubProvider> = vec![
        StubProvider {
            name: "spotify",
            available: true,
            outcome: Ok(vec![hit.clone()]),
        },
        StubProvider {
            name: "youtube",
            available: true,
            outcome: Err(SearchError::Request("down".into())),
        },
        StubProvider {
            name: "dormant",
            available: false,
            outcome: Ok(vec![]),
        },
    ];
    let refs: Vec<&dyn SearchProvider> = providers.iter().map(|p| p as &dyn SearchProvider).collect();

    let outcome = search_all(&refs, "song");
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].provider, "spotify");
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.failures[0].0, "youtube");
    assert_eq!(outcome.failures[1].0, "dormant");

    let merged = outcome.merged();
    assert_eq!(merged.len(), 1);
    assert!(merged[0].same_identity(&hit));
}

#[test]
fn unconfigured_provider_is_reported_as_unavailable() {
    let provider = StubProvider {
        name: "spotify",
        available: false,
        outcome: Ok(vec![]),
    };
    let refs: Vec<&dyn SearchProvider> = vec![&provider];

    let outcome = search_all(&refs, "song");
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].0, "spotify");
    assert!(matches!(
        outcome.failures[0].1,
        SearchError::ProviderUnavailable("spotify")
    ));
}
