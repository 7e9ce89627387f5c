//! Implementations shared by the subcommands and the interactive menu.

use std::path::Path;
use std::time::Instant;

use species_map_cli_utils::{IndicatifProgress, MultiProgress};
use species_map_database::{SpeciesStore, import};
use species_map_geography::{build_circle, to_geojson};
use species_map_geography_models::GeoPoint;
use species_map_images::{WikimediaConfig, build_client, run_image_job};

/// How `aoi` renders the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AoiFormat {
    /// `POLYGON((lon lat,...))`
    Wkt,
    /// GeoJSON geometry object
    Geojson,
    /// One `lat,lng` pair per line
    Latlng,
}

/// Starts the API server.
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
pub async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(species_map_server::run_server())
    })
    .await??;
    Ok(())
}

/// Runs the species pipeline once and prints the result as JSON.
pub async fn list(lat: f64, lon: f64, radius: f64) -> Result<(), Box<dyn std::error::Error>> {
    let state = species_map_server::build_state()?;
    let start = Instant::now();

    let species = state
        .species
        .list_species_within(GeoPoint::new(lat, lon), radius)
        .await?;

    log::info!(
        "Resolved {} species in {:.1}s",
        species.len(),
        start.elapsed().as_secs_f64()
    );
    println!("{}", serde_json::to_string_pretty(&species)?);
    Ok(())
}

/// Renders the area of interest for a point.
///
/// # Errors
///
/// Returns an error if GeoJSON serialization fails.
pub fn aoi(
    lat: f64,
    lon: f64,
    radius: f64,
    resolution: u32,
    format: AoiFormat,
) -> Result<String, serde_json::Error> {
    let area = build_circle(GeoPoint::new(lat, lon), radius, resolution);

    Ok(match format {
        AoiFormat::Wkt => area.to_wkt(),
        AoiFormat::Geojson => serde_json::to_string_pretty(&to_geojson(&area))?,
        AoiFormat::Latlng => area.to_lat_lng_lines(),
    })
}

/// Runs the image job over `names`, or over every stored species when
/// `names` is empty.
pub async fn images(
    multi: &MultiProgress,
    names: Vec<String>,
    delay_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SpeciesStore::open_default()?;

    let mut config = WikimediaConfig::load()?;
    if let Some(ms) = delay_ms {
        config = config.with_delay_ms(ms);
    }
    let client = build_client(&config)?;

    let names = if names.is_empty() {
        store.scientific_names()?
    } else {
        names
    };

    let progress = IndicatifProgress::species_bar(multi, "Fetching images");
    let summary = run_image_job(&client, &config, &store, &names, &progress).await;

    log::info!(
        "Image job done: {} stored, {} without image, {} without metadata, {} download failures, {} errors",
        summary.stored,
        summary.no_image,
        summary.no_metadata,
        summary.download_failed,
        summary.errors,
    );
    Ok(())
}

/// Loads species documents and synonym mappings into the default store.
pub fn import(
    species: Option<&Path>,
    alternate_names: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if species.is_none() && alternate_names.is_none() {
        log::warn!("Nothing to import; pass --species and/or --alternate-names");
        return Ok(());
    }

    let store = SpeciesStore::open_default()?;

    if let Some(path) = species {
        let count = import::import_species_file(&store, path)?;
        log::info!("Imported {count} species from {}", path.display());
    }
    if let Some(path) = alternate_names {
        let count = import::import_alternate_names_file(&store, path)?;
        log::info!("Imported {count} alternate names from {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aoi_wkt_is_a_closed_polygon() {
        let wkt = aoi(39.0, -106.0, 10.0, 1, AoiFormat::Wkt).unwrap();
        assert!(wkt.starts_with("POLYGON(("));
        assert_eq!(wkt.matches(',').count(), 4);
    }

    #[test]
    fn aoi_geojson_is_a_polygon() {
        let json = aoi(39.0, -106.0, 10.0, 2, AoiFormat::Geojson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0].as_array().unwrap().len(), 9);
    }

    #[test]
    fn aoi_lat_lng_lines() {
        let lines = aoi(0.0, 0.0, 10.0, 1, AoiFormat::Latlng).unwrap();
        assert_eq!(lines.lines().count(), 5);
    }
}
