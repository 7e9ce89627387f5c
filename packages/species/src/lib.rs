#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves nearby occurrence records into ranked species documents.
//!
//! [`SpeciesManager::list_species`] is the whole pipeline: build a circular
//! area of interest, run one occurrence search, rank the species names, and
//! look each name up in the record store. Names the store cannot resolve
//! are dropped without being reported.

use std::sync::Arc;

use species_map_database::SpeciesStore;
use species_map_database_models::SpeciesRecord;
use species_map_geography::{DEFAULT_RADIUS_KM, DEFAULT_RESOLUTION, build_circle};
use species_map_geography_models::GeoPoint;
use species_map_occurrence::{OccurrenceError, OccurrenceSearch, SearchOptions, rank_species};

/// Errors surfaced by the species pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SpeciesError {
    /// The occurrence search failed, so no species list can be produced.
    #[error("Species list not available: {source}")]
    NotAvailable {
        /// The underlying search failure.
        #[from]
        source: OccurrenceError,
    },
}

/// Composes the occurrence search and the record store.
///
/// Holds long-lived handles; one manager serves any number of requests.
/// Nothing is cached between calls.
pub struct SpeciesManager {
    search: Arc<dyn OccurrenceSearch>,
    store: Arc<SpeciesStore>,
    options: SearchOptions,
    resolution: u32,
}

impl SpeciesManager {
    /// Creates a manager using default search options.
    #[must_use]
    pub fn new(search: Arc<dyn OccurrenceSearch>, store: Arc<SpeciesStore>) -> Self {
        Self {
            search,
            store,
            options: SearchOptions::default(),
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Overrides the search options sent with every query.
    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the circle resolution (segments per quadrant).
    #[must_use]
    pub const fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// The record store backing this manager.
    #[must_use]
    pub fn store(&self) -> &SpeciesStore {
        &self.store
    }

    /// Lists species observed within [`DEFAULT_RADIUS_KM`] of `center`.
    ///
    /// # Errors
    ///
    /// See [`Self::list_species_within`].
    pub async fn list_species(&self, center: GeoPoint) -> Result<Vec<SpeciesRecord>, SpeciesError> {
        self.list_species_within(center, DEFAULT_RADIUS_KM).await
    }

    /// Lists species observed within `radius_km` of `center`, most
    /// frequently observed first.
    ///
    /// An empty list means the search succeeded but nothing resolved.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::NotAvailable`] if the occurrence search
    /// fails for any reason. No partial results are returned in that case.
    pub async fn list_species_within(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<SpeciesRecord>, SpeciesError> {
        let area = build_circle(center, radius_km, self.resolution);

        let result = match self.search.search(&area, &self.options).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "Occurrence search failed for ({}, {}) r={radius_km}km: {e}",
                    center.latitude,
                    center.longitude,
                );
                return Err(e.into());
            }
        };

        let names = rank_species(&result.records);
        log::debug!(
            "Ranked {} species from {} occurrence records",
            names.len(),
            result.records.len()
        );

        Ok(self.resolve(&names))
    }

    /// Looks up each ranked name, keeping only the ones that resolve.
    fn resolve(&self, names: &[String]) -> Vec<SpeciesRecord> {
        let mut species = Vec::with_capacity(names.len());

        for name in names {
            match self.store.find_species(name) {
                Ok(Some(record)) => species.push(record),
                Ok(None) => log::debug!("No species record for {name:?}"),
                Err(e) => log::warn!("Species lookup for {name:?} failed: {e}"),
            }
        }

        species
    }
}
