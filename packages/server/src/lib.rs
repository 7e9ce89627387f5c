#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the species map.
//!
//! Exposes the species pipeline as `GET /species?latitude=..&longitude=..`
//! plus a health check and stored-image retrieval. Request parsing lives
//! here; the pipeline itself is a library call into `species_map_species`.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use species_map_database::SpeciesStore;
use species_map_occurrence::bison::BisonClient;
use species_map_occurrence::service_registry;
use species_map_species::SpeciesManager;

/// Shared application state.
pub struct AppState {
    /// The species pipeline, holding the search client and record store.
    pub species: SpeciesManager,
}

/// Bind address and port for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// Opens the species database and builds the search client from the
/// embedded service configuration.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the service
/// configuration is malformed.
pub fn build_state() -> Result<AppState, Box<dyn std::error::Error>> {
    log::info!("Opening species database...");
    let store = SpeciesStore::open_default()?;

    let service = service_registry::load_service()?;
    let client = BisonClient::for_service(reqwest::Client::new(), &service);
    log::info!("Using occurrence search {} at {}", service.name, client.base_url());

    let species = SpeciesManager::new(Arc::new(client), Arc::new(store))
        .with_options(service.default_options());

    Ok(AppState { species })
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/species", web::get().to(handlers::species))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/species", web::get().to(handlers::species))
                .route("/images/{id}", web::get().to(handlers::image)),
        );
}

/// Starts the species map API server with configuration from the
/// environment.
///
/// The caller is responsible for initializing logging and providing the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the application state cannot be
/// built or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    run_server_with(ServerConfig::from_env()).await
}

/// Starts the species map API server on the given address.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the application state cannot be
/// built or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server_with(config: ServerConfig) -> std::io::Result<()> {
    let state = build_state().map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(state);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
