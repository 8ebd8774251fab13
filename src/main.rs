//! # dtcg-snapshot
//!
//! Fetches the Digimon Card Game card list from the digimoncard.io public API and
//! writes it, stamped with the capture time, to a JSON file. Meant to be run by a
//! scheduled CI job that commits the result.

use anyhow::{Context, Result};
use clap::Parser;
use dtcg_snapshot::Fetcher;
use dtcg_snapshot::config::{
    DEFAULT_ENDPOINT, DEFAULT_OUTPUT, DEFAULT_REQUEST_DELAY_MS, DEFAULT_SERIES,
    DEFAULT_TIMEOUT_SECS, FetchConfig,
};
use dtcg_snapshot::remote::HttpCardSource;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Captures the Digimon Card Game card list from the digimoncard.io public API.\n\
                  With no arguments, writes data/digimon_cards.json in the current directory."
)]
struct Args {
    /// Card list endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Card series to request
    #[arg(long, default_value = DEFAULT_SERIES)]
    series: String,

    /// Path of the snapshot file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Pause after the request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_MS)]
    delay_ms: u64,

    /// Request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> FetchConfig {
        FetchConfig {
            endpoint: self.endpoint,
            output: self.output,
            request_delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            ..FetchConfig::for_series(&self.series)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn run(config: FetchConfig) -> Result<()> {
    let source = HttpCardSource::new(&config)?;
    Fetcher::new(source, config)
        .run()
        .context("card snapshot failed")?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(args.into_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("snapshot run aborted: {err:#}");
            ExitCode::FAILURE
        }
    }
}
