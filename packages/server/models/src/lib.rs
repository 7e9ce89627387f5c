#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the species map server.

use serde::{Deserialize, Serialize};
use species_map_database_models::SpeciesRecord;

/// Query parameters for `GET /species`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpeciesQueryParams {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Search radius in kilometers (defaults to 10).
    pub radius: Option<f64>,
}

/// Response from `GET /species`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesResponse {
    /// Resolved species, most frequently observed first.
    pub species: Vec<SpeciesRecord>,
}

/// Response from `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `true` when the server is answering.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Body returned with any error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error description.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
