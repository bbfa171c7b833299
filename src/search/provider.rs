use thiserror::Error;

use crate::track::Track;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider has no credentials configured or cannot run at all.
    #[error("provider '{0}' is not available")]
    ProviderUnavailable(&'static str),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// A remote catalogue that can be queried for tracks.
pub trait SearchProvider {
    /// Short stable name, used to label results and failures.
    fn name(&self) -> &'static str;

    /// Whether the provider is configured well enough to even try.
    fn available(&self) -> bool;

    fn search(&self, query: &str) -> Result<Vec<Track>, SearchError>;
}

/// Results from one provider, labelled with its name.
#[derive(Debug)]
pub struct ProviderResults {
    pub provider: &'static str,
    pub tracks: Vec<Track>,
}

/// Combined outcome of a fan-out search.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub results: Vec<ProviderResults>,
    pub failures: Vec<(&'static str, SearchError)>,
}

impl SearchOutcome {
    /// All tracks in provider order, flattened.
    pub fn merged(self) -> Vec<Track> {
        self.results.into_iter().flat_map(|r| r.tracks).collect()
    }
}

/// Runs `query` against every provider. A provider that errors lands in
/// `failures` without affecting the others; one that is not configured at
/// all is reported there as `ProviderUnavailable` so the host can tell the
/// user why its results are missing.
pub fn search_all(providers: &[&dyn SearchProvider], query: &str) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();
    for provider in providers {
        if !provider.available() {
            log::debug!("provider {} is not configured", provider.name());
            outcome
                .failures
                .push((provider.name(), SearchError::ProviderUnavailable(provider.name())));
            continue;
        }
        match provider.search(query) {
            Ok(tracks) => {
                log::info!("{}: {} result(s) for {query:?}", provider.name(), tracks.len());
                outcome.results.push(ProviderResults {
                    provider: provider.name(),
                    tracks,
                });
            }
            Err(err) => {
                log::warn!("{} search failed: {err}", provider.name());
                outcome.failures.push((provider.name(), err));
            }
        }
    }
    outcome
}
