#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch job that attaches Wikipedia taxobox images to species records.
//!
//! For each species the job:
//!
//! 1. Fetches the species' Wikipedia page and finds the main taxobox image
//!    ([`taxobox`]).
//! 2. Looks up the image's attribution on Wikimedia Commons ([`commons`]).
//! 3. Downloads the image ([`download`]) and stores it alongside the
//!    attribution in the species database ([`job`]).
//!
//! Every step is best effort. A species with no usable image has its image
//! fields cleared. The job shares no state with the species pipeline; it
//! only writes through the store's image operations.

pub mod commons;
pub mod config;
pub mod download;
pub mod job;
pub mod progress;
pub mod taxobox;

use species_map_database::DbError;

pub use config::WikimediaConfig;
pub use job::{ImageJobSummary, ImageOutcome, run_image_job};

/// Errors from image scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// An HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selector or configuration could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Writing results to the species database failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Builds an HTTP client that identifies itself with the configured
/// user agent.
///
/// # Errors
///
/// Returns [`ImageError::Http`] if the client cannot be constructed.
pub fn build_client(config: &WikimediaConfig) -> Result<reqwest::Client, ImageError> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .build()?)
}

/// Waits out the politeness delay after a remote request.
pub(crate) async fn pause(config: &WikimediaConfig) {
    if config.delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(config.delay_ms)).await;
    }
}
