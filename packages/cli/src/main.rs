#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI orchestrator for the species map toolchain.
//!
//! Every tool is reachable as a subcommand. Run with no subcommand to pick
//! one interactively.
//!
//! Uses `indicatif-log-bridge` (via [`species_map_cli_utils::init_logger`])
//! so log lines and progress bars never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::AoiFormat;

#[derive(Parser)]
#[command(name = "species_map_cli", about = "Species map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// List species observed around a point, most frequent first
    List {
        /// Center latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Center longitude
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Search radius in kilometers
        #[arg(long, default_value_t = species_map_geography::DEFAULT_RADIUS_KM)]
        radius: f64,
    },
    /// Print the search polygon for a point
    Aoi {
        /// Center latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Center longitude
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Radius in kilometers
        #[arg(long, default_value_t = species_map_geography::DEFAULT_RADIUS_KM)]
        radius: f64,
        /// Segments per quadrant
        #[arg(long, default_value_t = species_map_geography::DEFAULT_RESOLUTION)]
        resolution: u32,
        /// Output format
        #[arg(long, value_enum, default_value_t = AoiFormat::Wkt)]
        format: AoiFormat,
    },
    /// Attach Wikipedia taxobox images to species records
    Images {
        /// Scientific names to process (defaults to every stored species)
        names: Vec<String>,
        /// Politeness delay between requests, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Import species documents and synonym mappings from JSON files
    Import {
        /// JSON array of species documents
        #[arg(long)]
        species: Option<PathBuf>,
        /// JSON array of `{alternate_name, primary_name}` mappings
        #[arg(long)]
        alternate_names: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = species_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        None => interactive::run(&multi).await?,
        Some(Commands::Serve) => commands::serve().await?,
        Some(Commands::List { lat, lon, radius }) => commands::list(lat, lon, radius).await?,
        Some(Commands::Aoi {
            lat,
            lon,
            radius,
            resolution,
            format,
        }) => println!("{}", commands::aoi(lat, lon, radius, resolution, format)?),
        Some(Commands::Images { names, delay_ms }) => {
            commands::images(&multi, names, delay_ms).await?;
        }
        Some(Commands::Import {
            species,
            alternate_names,
        }) => commands::import(species.as_deref(), alternate_names.as_deref())?,
    }

    Ok(())
}
