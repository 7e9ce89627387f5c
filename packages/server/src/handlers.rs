//! HTTP handler functions for the species map API.

use actix_web::{HttpResponse, http::header, web};
use species_map_geography::DEFAULT_RADIUS_KM;
use species_map_geography_models::GeoPoint;
use species_map_server_models::{ApiError, ApiHealth, SpeciesQueryParams, SpeciesResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /species`
///
/// Lists species observed around a point, most frequently observed first.
/// Responds `400` for a radius that is not a positive number and `503` when
/// the occurrence search is unavailable.
pub async fn species(
    state: web::Data<AppState>,
    params: web::Query<SpeciesQueryParams>,
) -> HttpResponse {
    let center = GeoPoint::new(params.latitude, params.longitude);
    let radius = params.radius.unwrap_or(DEFAULT_RADIUS_KM);

    if !radius.is_finite() || radius <= 0.0 {
        return HttpResponse::BadRequest().json(ApiError::new(format!(
            "radius must be a positive number of kilometers, got {radius}"
        )));
    }

    match state.species.list_species_within(center, radius).await {
        Ok(species) => HttpResponse::Ok().json(SpeciesResponse { species }),
        Err(e) => {
            log::error!("Species list failed: {e}");
            HttpResponse::ServiceUnavailable().json(ApiError::new(e.to_string()))
        }
    }
}

/// `GET /api/images/{id}`
///
/// Serves a stored species image by id.
pub async fn image(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();

    match state.species.store().find_image(&id) {
        Ok(Some(image)) => HttpResponse::Ok()
            .content_type(content_type_for(&image.filename))
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", image.filename),
            ))
            .body(image.content),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new(format!("No image {id}"))),
        Err(e) => {
            log::error!("Image lookup for {id} failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Image lookup failed"))
        }
    }
}

/// Guesses a MIME type from a stored file name's extension.
fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
