//! Bulk loading of species documents and synonym mappings.
//!
//! Records are created by ingestion, never by the species pipeline. Input
//! files are JSON arrays of [`SpeciesRecord`] or [`AlternateNameMapping`]
//! objects.

use std::path::Path;

use serde::de::DeserializeOwned;
use species_map_database_models::{AlternateNameMapping, SpeciesRecord};

use crate::{DbError, SpeciesStore};

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DbError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Upserts every species document.
///
/// Returns the number of documents written.
///
/// # Errors
///
/// Returns [`DbError`] if a document cannot be written.
pub fn import_species(store: &SpeciesStore, records: &[SpeciesRecord]) -> Result<usize, DbError> {
    for record in records {
        store.upsert_species(record)?;
    }
    log::info!("Imported {} species documents", records.len());
    Ok(records.len())
}

/// Upserts every synonym mapping.
///
/// Returns the number of mappings written.
///
/// # Errors
///
/// Returns [`DbError`] if a mapping cannot be written.
pub fn import_alternate_names(
    store: &SpeciesStore,
    mappings: &[AlternateNameMapping],
) -> Result<usize, DbError> {
    for mapping in mappings {
        store.insert_alternate_name(mapping)?;
    }
    log::info!("Imported {} alternate names", mappings.len());
    Ok(mappings.len())
}

/// Reads a JSON array of species documents from `path` and upserts them.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read or parsed, or a write
/// fails.
pub fn import_species_file(store: &SpeciesStore, path: &Path) -> Result<usize, DbError> {
    import_species(store, &read_json_array(path)?)
}

/// Reads a JSON array of synonym mappings from `path` and upserts them.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be read or parsed, or a write
/// fails.
pub fn import_alternate_names_file(store: &SpeciesStore, path: &Path) -> Result<usize, DbError> {
    import_alternate_names(store, &read_json_array(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_files() {
        let tmp = std::env::temp_dir().join("species_map_import_test");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();

        let species_path = tmp.join("species.json");
        std::fs::write(
            &species_path,
            r#"[
                {"scientific_name": "Corvus corax", "common_name": "Common raven"},
                {"scientific_name": "Aphelocoma woodhouseii"}
            ]"#,
        )
        .unwrap();

        let names_path = tmp.join("alternate_names.json");
        std::fs::write(
            &names_path,
            r#"[{"alternate_name": "Aphelocoma californica woodhouseii",
                 "primary_name": "Aphelocoma woodhouseii"}]"#,
        )
        .unwrap();

        let store = SpeciesStore::open_in_memory().unwrap();
        assert_eq!(import_species_file(&store, &species_path).unwrap(), 2);
        assert_eq!(import_alternate_names_file(&store, &names_path).unwrap(), 1);

        let record = store
            .find_species("Aphelocoma californica woodhouseii")
            .unwrap()
            .unwrap();
        assert_eq!(record.scientific_name, "Aphelocoma woodhouseii");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_array_input() {
        let tmp = std::env::temp_dir().join("species_map_import_bad_test");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("species.json");
        std::fs::write(&path, r#"{"scientific_name": "Corvus corax"}"#).unwrap();

        let store = SpeciesStore::open_in_memory().unwrap();
        assert!(matches!(
            import_species_file(&store, &path),
            Err(DbError::Json(_))
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
