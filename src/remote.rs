//! Access to the upstream card list.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::FetchError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Something that can hand back the raw card list body.
pub trait CardSource {
    /// Performs the single request of a run and returns the response body.
    fn fetch(&self) -> Result<Vec<u8>, FetchError>;

    /// Where the cards come from, for logging.
    fn location(&self) -> String;
}

/// Query parameters of the card list request: the whole series, sorted by name.
pub fn card_list_query(series: &str) -> Vec<(String, String)> {
    vec![
        ("sort".to_string(), "name".to_string()),
        ("sortdirection".to_string(), "asc".to_string()),
        ("series".to_string(), series.to_string()),
    ]
}

/// Blocking HTTP card source.
#[derive(Debug, Clone)]
pub struct HttpCardSource {
    client: Client,
    url: Url,
}

impl HttpCardSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let url = Url::parse_with_params(&config.endpoint, &config.query).map_err(|err| {
            FetchError::InvalidEndpoint {
                url: config.endpoint.clone(),
                reason: err.to_string(),
            }
        })?;
        let client = http_client(config.timeout).map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;
        Ok(Self { client, url })
    }

    /// Full request URL including the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl CardSource for HttpCardSource {
    fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let network = |source: reqwest::Error| FetchError::Network {
            url: self.url.to_string(),
            source,
        };

        let response = self.client.get(self.url.clone()).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        debug!(%status, content_length = ?response.content_length(), "receiving card list");
        let body = response.bytes().map_err(network)?;
        Ok(body.to_vec())
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
