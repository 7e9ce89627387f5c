#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the species database.
//!
//! All defaults are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the species database location.
pub const SPECIES_DB_PATH_ENV: &str = "SPECIES_DB_PATH";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// manifest directory itself if it has no grandparent.
#[must_use]
pub fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.ancestors().nth(2).unwrap_or(manifest).to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the species database path, honoring [`SPECIES_DB_PATH_ENV`].
#[must_use]
pub fn species_db_path() -> PathBuf {
    std::env::var(SPECIES_DB_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| data_dir().join("species.duckdb"), PathBuf::from)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
