//! dtcg-snapshot library: captures the Digimon Card Game card list into a JSON snapshot file.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod remote;
pub mod store;

pub use error::FetchError;
pub use fetcher::Fetcher;
pub use model::{CardRecord, Snapshot};
