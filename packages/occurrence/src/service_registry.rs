//! Embedded configuration for the occurrence search service.
//!
//! The endpoint is described in `services/bison.toml`, embedded at compile
//! time. `SPECIES_MAP_BISON_URL` overrides the base URL at runtime.

use serde::Deserialize;

use crate::{OccurrenceError, SearchOptions};

/// Environment variable that overrides the search endpoint.
pub const BASE_URL_ENV: &str = "SPECIES_MAP_BISON_URL";

const BISON_TOML: &str = include_str!("../services/bison.toml");

/// An occurrence search service definition.
#[derive(Debug, Clone, Deserialize)]
pub struct OccurrenceService {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Full URL of the search endpoint.
    pub base_url: String,
    /// Default basis-of-observation filter.
    #[serde(default = "default_basis")]
    pub basis_of_observation: String,
    /// Default number of records to request.
    #[serde(default = "default_count")]
    pub count: u64,
}

fn default_basis() -> String {
    crate::DEFAULT_BASIS_OF_OBSERVATION.to_owned()
}

const fn default_count() -> u64 {
    crate::DEFAULT_COUNT
}

impl OccurrenceService {
    /// Search options built from this service's defaults.
    #[must_use]
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_basis_of_observation(&self.basis_of_observation)
            .with_count(self.count)
    }
}

/// Parses the embedded service definition without environment overrides.
///
/// # Errors
///
/// Returns [`OccurrenceError::Config`] if the embedded TOML is malformed.
pub fn embedded_service() -> Result<OccurrenceService, OccurrenceError> {
    Ok(toml::de::from_str(BISON_TOML)?)
}

/// Loads the service definition, applying [`BASE_URL_ENV`] if set.
///
/// # Errors
///
/// Returns [`OccurrenceError::Config`] if the embedded TOML is malformed.
pub fn load_service() -> Result<OccurrenceService, OccurrenceError> {
    let mut service = embedded_service()?;
    if let Ok(url) = std::env::var(BASE_URL_ENV)
        && !url.trim().is_empty()
    {
        log::info!("Using occurrence search endpoint from {BASE_URL_ENV}: {url}");
        service.base_url = url;
    }
    Ok(service)
}
