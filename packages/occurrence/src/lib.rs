#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Occurrence search client and species ranking.
//!
//! The [`OccurrenceSearch`] trait abstracts the remote biodiversity
//! occurrence service; [`bison::BisonClient`] is the production
//! implementation. [`ranking`] turns the returned records into a
//! frequency-ordered list of canonical species names.

pub mod bison;
pub mod ranking;
pub mod service_registry;

use async_trait::async_trait;
use species_map_geography_models::AreaOfInterest;
use species_map_occurrence_models::SearchResult;

pub use ranking::{canonical_name, rank_species, rank_species_with_counts};

/// Default basis-of-observation filter.
pub const DEFAULT_BASIS_OF_OBSERVATION: &str = "observation";

/// Default number of records requested per search.
pub const DEFAULT_COUNT: u64 = 1_000_000;

/// Errors from occurrence search operations.
#[derive(Debug, thiserror::Error)]
pub enum OccurrenceError {
    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid search result.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The search endpoint answered with a non-success status.
    #[error("Occurrence search returned status {status}")]
    UpstreamUnavailable {
        /// HTTP status code.
        status: u16,
    },

    /// The area of interest is not a closed ring of at least four vertices.
    #[error("Area of interest is degenerate ({vertices} vertices)")]
    DegenerateArea {
        /// Number of vertices in the rejected ring.
        vertices: usize,
    },

    /// An embedded service definition could not be parsed.
    #[error("Service configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Filters applied to a search besides the area of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Basis-of-observation category (e.g. `"observation"`, `"specimen"`).
    pub basis_of_observation: String,
    /// Maximum number of records to request.
    pub count: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            basis_of_observation: DEFAULT_BASIS_OF_OBSERVATION.to_owned(),
            count: DEFAULT_COUNT,
        }
    }
}

impl SearchOptions {
    /// Sets the basis-of-observation filter.
    #[must_use]
    pub fn with_basis_of_observation(mut self, basis: &str) -> Self {
        basis.clone_into(&mut self.basis_of_observation);
        self
    }

    /// Sets the requested record count.
    #[must_use]
    pub const fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }
}

/// A service that returns occurrence records inside an area of interest.
///
/// Implementations issue exactly one request per call and return only the
/// first page of results; there is no retry.
#[async_trait]
pub trait OccurrenceSearch: Send + Sync {
    /// Searches for occurrences inside `area`.
    ///
    /// # Errors
    ///
    /// Returns [`OccurrenceError`] if the request fails, the service
    /// answers with a non-success status, or the body cannot be parsed.
    async fn search(
        &self,
        area: &AreaOfInterest,
        options: &SearchOptions,
    ) -> Result<SearchResult, OccurrenceError>;
}
