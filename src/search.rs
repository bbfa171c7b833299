//! Track search across streaming providers.
//!
//! Each provider implements [`SearchProvider`]; [`search_all`] fans a query
//! out to every configured provider and keeps their failures isolated, so one
//! provider going down never hides results from the others.

mod provider;
mod spotify;
mod youtube;

pub use provider::{ProviderResults, SearchError, SearchOutcome, SearchProvider, search_all};
pub use spotify::SpotifyClient;
pub use youtube::YouTubeClient;

#[cfg(test)]
mod tests;
