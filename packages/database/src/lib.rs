#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Taxonomic record store for the species map.
//!
//! Species documents, alternate-name mappings, and image blobs live in a
//! single `DuckDB` file (see [`paths::species_db_path`]). The store is a
//! long-lived handle shared across requests; see [`species_store`].

pub mod import;
pub mod paths;
pub mod species_store;

pub use species_store::SpeciesStore;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` query error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored or imported document is not valid JSON for its type.
    #[error("Document error: {0}")]
    Json(#[from] serde_json::Error),

    /// A thread panicked while holding the connection lock.
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}
