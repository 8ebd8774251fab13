//! The single-shot fetch and persist sequence.

use std::thread;

use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::model::{self, Snapshot};
use crate::remote::CardSource;
use crate::store;

/// Runs one capture: request, pause, parse, timestamp, write.
pub struct Fetcher<S> {
    source: S,
    config: FetchConfig,
}

impl<S: CardSource> Fetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Captures the card list and writes it to the configured output path.
    ///
    /// Nothing is written unless the request and the parse both succeed.
    pub fn run(&self) -> Result<Snapshot, FetchError> {
        info!(source = %self.source.location(), "fetching card list");
        let body = self.source.fetch()?;
        debug!(bytes = body.len(), "card list received");

        let delay = self.config.request_delay;
        if !delay.is_zero() {
            debug!(?delay, "pausing before processing");
            thread::sleep(delay);
        }

        let cards = model::parse_cards(&body)?;
        let snapshot = Snapshot::capture(cards);
        self.log_previous(&snapshot);

        store::write_snapshot(&self.config.output, &snapshot)?;
        info!(
            path = %self.config.output.display(),
            cards = snapshot.cards.len(),
            fetched_at = %snapshot.fetched_at,
            "snapshot written"
        );
        Ok(snapshot)
    }

    fn log_previous(&self, snapshot: &Snapshot) {
        match store::read_snapshot(&self.config.output) {
            Ok(Some(previous)) => info!(
                previous_fetched_at = %previous.fetched_at,
                previous_cards = previous.cards.len(),
                cards = snapshot.cards.len(),
                "replacing previous snapshot"
            ),
            Ok(None) => debug!(path = %self.config.output.display(), "no previous snapshot"),
            Err(err) => warn!(error = %err, "previous snapshot is unreadable, overwriting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, Instant};

    enum Reply {
        Body(&'static str),
        Status(u16),
    }

    struct StubSource {
        reply: Reply,
        calls: Cell<usize>,
    }

    impl StubSource {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl CardSource for StubSource {
        fn fetch(&self) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                Reply::Body(body) => Ok(body.as_bytes().to_vec()),
                Reply::Status(code) => Err(FetchError::Status {
                    url: self.location(),
                    status: StatusCode::from_u16(code).unwrap(),
                }),
            }
        }

        fn location(&self) -> String {
            "stub://cards".to_string()
        }
    }

    fn test_config(output: &Path) -> FetchConfig {
        FetchConfig {
            output: output.to_path_buf(),
            request_delay: Duration::ZERO,
            ..FetchConfig::default()
        }
    }

    const CARDS: &str = r#"[{"name":"Agumon","cardnumber":"BT1-010"},{"name":"Gabumon","cardnumber":"BT1-029"}]"#;

    #[test]
    fn test_run_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data").join("digimon_cards.json");
        let fetcher = Fetcher::new(StubSource::new(Reply::Body(CARDS)), test_config(&output));

        let snapshot = fetcher.run().unwrap();

        assert_eq!(fetcher.source.calls.get(), 1);
        assert_eq!(snapshot.cards.len(), 2);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let object = written.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["fetched_at"].is_string());
        assert_eq!(
            object["cards"],
            json!([
                {"name": "Agumon", "cardnumber": "BT1-010"},
                {"name": "Gabumon", "cardnumber": "BT1-029"}
            ])
        );
    }

    #[test]
    fn test_status_failure_leaves_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        fs::write(&output, "previous").unwrap();
        let fetcher = Fetcher::new(StubSource::new(Reply::Status(500)), test_config(&output));

        let err = fetcher.run().unwrap_err();

        assert!(err.is_network());
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_invalid_json_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        let fetcher = Fetcher::new(
            StubSource::new(Reply::Body("[{\"name\": ")),
            test_config(&output),
        );

        let err = fetcher.run().unwrap_err();

        assert!(err.is_parse());
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_object_body_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        let fetcher = Fetcher::new(
            StubSource::new(Reply::Body(r#"{"error":"Too many requests"}"#)),
            test_config(&output),
        );

        assert!(fetcher.run().unwrap_err().is_parse());
        assert!(!output.exists());
    }

    #[test]
    fn test_rerun_keeps_cards_and_advances_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        let fetcher = Fetcher::new(StubSource::new(Reply::Body(CARDS)), test_config(&output));

        let first = fetcher.run().unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let second = fetcher.run().unwrap();

        assert_eq!(first.cards, second.cards);
        assert!(second.fetched_at > first.fetched_at);
        assert_eq!(store::read_snapshot(&output).unwrap().unwrap(), second);
    }

    #[test]
    fn test_overwrites_unreadable_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        fs::write(&output, r#"{"last_updated": null, "cards": {}}"#).unwrap();
        let fetcher = Fetcher::new(StubSource::new(Reply::Body(CARDS)), test_config(&output));

        let snapshot = fetcher.run().unwrap();

        assert_eq!(store::read_snapshot(&output).unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_request_delay_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("digimon_cards.json");
        let config = FetchConfig {
            request_delay: Duration::from_millis(50),
            ..test_config(&output)
        };
        let fetcher = Fetcher::new(StubSource::new(Reply::Body("[]")), config);

        let started = Instant::now();
        fetcher.run().unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
