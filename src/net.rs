//! Connectivity probes used to decide whether remote sources are worth
//! offering at all.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

const PROBE_URL: &str = "https://www.google.com";
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1/";
const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/";
// Public DNS, used as a raw TCP fallback when HTTP is blocked.
const DNS_FALLBACK: &str = "8.8.8.8:53";

/// Snapshot of what the network currently allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStatus {
    pub internet: bool,
    pub spotify_api: bool,
    pub youtube_api: bool,
}

impl NetworkStatus {
    /// Probes general connectivity first and only then the API endpoints.
    pub fn probe(timeout: Duration) -> Self {
        let internet = online(timeout);
        if !internet {
            return Self::default();
        }
        Self {
            internet,
            spotify_api: spotify_api_reachable(timeout),
            youtube_api: youtube_api_reachable(timeout),
        }
    }
}

/// True when some route to the internet exists. Tries an HTTPS request
/// first, then falls back to a bare TCP connection to a public DNS server.
pub fn online(timeout: Duration) -> bool {
    if probe_status(PROBE_URL, timeout, &[200]) {
        return true;
    }
    let addr: SocketAddr = match DNS_FALLBACK.parse() {
        Ok(addr) => addr,
        Err(_) => return false,
    };
    TcpStream::connect_timeout(&addr, timeout).is_ok()
}

/// 401 means the API answered and wants credentials, which is reachable
/// enough for our purposes.
pub fn spotify_api_reachable(timeout: Duration) -> bool {
    probe_status(SPOTIFY_API_URL, timeout, &[200, 401])
}

/// The Data API answers 400 to a bare request without parameters.
pub fn youtube_api_reachable(timeout: Duration) -> bool {
    probe_status(YOUTUBE_API_URL, timeout, &[200, 400])
}

fn probe_status(url: &str, timeout: Duration, accepted: &[u16]) -> bool {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into();
    match agent.get(url).call() {
        Ok(response) => accepted.contains(&response.status().as_u16()),
        Err(ureq::Error::StatusCode(code)) => accepted.contains(&code),
        Err(err) => {
            log::debug!("probe of {url} failed: {err}");
            false
        }
    }
}
