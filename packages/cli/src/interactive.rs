//! Menu-driven mode used when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use species_map_cli_utils::MultiProgress;
use species_map_geography::{DEFAULT_RADIUS_KM, DEFAULT_RESOLUTION};

use crate::commands::{self, AoiFormat};

/// Top-level tool selection.
enum Tool {
    Server,
    ListSpecies,
    Aoi,
    Images,
    Import,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Server,
        Self::ListSpecies,
        Self::Aoi,
        Self::Images,
        Self::Import,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::ListSpecies => "List species near a point",
            Self::Aoi => "Show search polygon",
            Self::Images => "Fetch species images",
            Self::Import => "Import species data",
        }
    }
}

fn prompt_point() -> Result<(f64, f64), dialoguer::Error> {
    let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
    let lon: f64 = Input::new().with_prompt("Longitude").interact_text()?;
    Ok((lat, lon))
}

fn prompt_radius() -> Result<f64, dialoguer::Error> {
    Input::new()
        .with_prompt("Radius (km)")
        .default(DEFAULT_RADIUS_KM)
        .interact_text()
}

fn prompt_path(prompt: &str) -> Result<Option<PathBuf>, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    Ok((!path.is_empty()).then(|| PathBuf::from(path)))
}

/// Prompts for a tool and its arguments, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected tool fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Species Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(species_map_server::interactive::run())
            })
            .await??;
        }
        Tool::ListSpecies => {
            let (lat, lon) = prompt_point()?;
            let radius = prompt_radius()?;
            commands::list(lat, lon, radius).await?;
        }
        Tool::Aoi => {
            let (lat, lon) = prompt_point()?;
            let radius = prompt_radius()?;
            let resolution: u32 = Input::new()
                .with_prompt("Segments per quadrant")
                .default(DEFAULT_RESOLUTION)
                .interact_text()?;
            let formats = ["WKT", "GeoJSON", "lat,lng lines"];
            let format = match Select::new()
                .with_prompt("Format")
                .items(&formats)
                .default(0)
                .interact()?
            {
                1 => AoiFormat::Geojson,
                2 => AoiFormat::Latlng,
                _ => AoiFormat::Wkt,
            };
            println!("{}", commands::aoi(lat, lon, radius, resolution, format)?);
        }
        Tool::Images => {
            let names: String = Input::new()
                .with_prompt("Species (comma-separated, blank for all)")
                .allow_empty(true)
                .interact_text()?;
            let names: Vec<String> = names
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
            commands::images(multi, names, None).await?;
        }
        Tool::Import => {
            let species = prompt_path("Species JSON file (blank to skip)")?;
            let alternate_names = prompt_path("Alternate names JSON file (blank to skip)")?;
            commands::import(species.as_deref(), alternate_names.as_deref())?;
        }
    }

    Ok(())
}
