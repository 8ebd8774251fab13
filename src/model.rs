//! Snapshot data model shared by the fetcher and the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One card exactly as the upstream API returned it.
///
/// The payload is never inspected or validated; key order is preserved
/// so the written snapshot mirrors the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardRecord(Value);

impl CardRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// The captured card list of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// UTC time the card list was captured, serialized as RFC 3339.
    pub fetched_at: DateTime<Utc>,
    /// The upstream card list, in response order.
    pub cards: Vec<CardRecord>,
}

impl Snapshot {
    pub fn new(cards: Vec<CardRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self { fetched_at, cards }
    }

    /// Stamps `cards` with the current time.
    pub fn capture(cards: Vec<CardRecord>) -> Self {
        Self::new(cards, Utc::now())
    }
}

/// Parses a card list response body. Anything but a JSON array is rejected.
pub fn parse_cards(body: &[u8]) -> Result<Vec<CardRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}
