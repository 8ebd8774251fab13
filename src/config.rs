//! Run configuration and its defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::remote::card_list_query;

/// Card list endpoint of the digimoncard.io public API.
pub const DEFAULT_ENDPOINT: &str = "https://digimoncard.io/api-public/getAllCards";
/// Series requested from the card list endpoint.
pub const DEFAULT_SERIES: &str = "Digimon Card Game";
/// Where the snapshot is written, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "data/digimon_cards.json";
/// Pause between receiving the response and processing it.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a single run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Endpoint URL without query string.
    pub endpoint: String,
    /// Query parameters appended to `endpoint`.
    pub query: Vec<(String, String)>,
    /// Snapshot file path.
    pub output: PathBuf,
    /// Fixed rate-limit pause after the request.
    pub request_delay: Duration,
    /// Overall request timeout.
    pub timeout: Duration,
}

impl FetchConfig {
    /// Default configuration requesting the given card series.
    pub fn for_series(series: &str) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: card_list_query(series),
            output: PathBuf::from(DEFAULT_OUTPUT),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::for_series(DEFAULT_SERIES)
    }
}
