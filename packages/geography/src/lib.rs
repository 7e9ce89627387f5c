#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area-of-interest construction for occurrence searches.
//!
//! Converts a center point and a radius into a closed polygon ring that
//! approximates a circle. The radius is converted to degrees with a single
//! fixed factor, so the circle is drawn in degree space: it is accurate near
//! the equator and becomes an increasingly squashed ellipse (in true
//! distance) toward the poles.

use std::f64::consts::FRAC_PI_2;

use geo::{Coord, LineString, Polygon};
use species_map_geography_models::{AreaOfInterest, GeoPoint};

/// Kilometers per degree of latitude at the equator.
pub const KM_PER_DEGREE: f64 = 110.574;

/// Default search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Default number of segments per quarter circle.
pub const DEFAULT_RESOLUTION: u32 = 4;

/// Converts a distance in kilometers to degrees.
#[must_use]
pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Builds a closed ring approximating a circle of `radius_km` around
/// `center`.
///
/// `resolution` is the number of segments per quadrant, so the ring has
/// `4 * resolution + 1` vertices (the first vertex is repeated last). A
/// resolution of zero is treated as one. The ring starts due north of the
/// center and proceeds clockwise when viewed on a map.
///
/// A non-positive (or non-finite) radius yields an empty area; callers
/// should not search with it.
#[must_use]
pub fn build_circle(center: GeoPoint, radius_km: f64, resolution: u32) -> AreaOfInterest {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        log::debug!("Non-positive radius {radius_km} km, returning empty area of interest");
        return AreaOfInterest::empty();
    }

    let radius = km_to_degrees(radius_km);
    let segments = resolution.max(1) * 4;
    let step = FRAC_PI_2 / f64::from(resolution.max(1));

    let ring: Vec<GeoPoint> = (0..segments)
        .map(|i| {
            let angle = f64::from(i) * step;
            GeoPoint::new(
                radius.mul_add(angle.cos(), center.latitude),
                radius.mul_add(angle.sin(), center.longitude),
            )
        })
        .collect();

    AreaOfInterest::from_ring(ring)
}

/// Converts an area of interest into a [`geo::Polygon`] in `(x = lng,
/// y = lat)` order.
#[must_use]
pub fn to_polygon(area: &AreaOfInterest) -> Polygon<f64> {
    let exterior: LineString<f64> = area
        .vertices()
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();
    Polygon::new(exterior, Vec::new())
}

/// Renders an area of interest as a `GeoJSON` polygon geometry.
#[must_use]
pub fn to_geojson(area: &AreaOfInterest) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(&to_polygon(area)))
}

#[cfg(test)]
mod tests {
    use geo::{Contains, Point};

    use super::*;

    const CENTER: GeoPoint = GeoPoint::new(39.0, -106.0);

    #[test]
    fn converts_km_to_degrees() {
        assert!((km_to_degrees(KM_PER_DEGREE) - 1.0).abs() < f64::EPSILON);
        assert!((km_to_degrees(10.0) - 0.090_437).abs() < 1e-6);
    }

    #[test]
    fn circle_is_closed_and_long_enough() {
        for resolution in [1, 2, 4, 16] {
            for radius in [0.5, 10.0, 250.0] {
                let aoi = build_circle(CENTER, radius, resolution);
                assert!(aoi.is_closed(), "ring not closed for r={radius} res={resolution}");
                assert!(aoi.len() >= 4);
                assert!(!aoi.is_degenerate());
            }
        }
    }

    #[test]
    fn resolution_controls_vertex_count() {
        assert_eq!(build_circle(CENTER, 10.0, 1).len(), 5);
        assert_eq!(build_circle(CENTER, 10.0, 4).len(), 17);
        assert_eq!(build_circle(CENTER, 10.0, 8).len(), 33);
    }

    #[test]
    fn zero_resolution_is_treated_as_one() {
        assert_eq!(build_circle(CENTER, 10.0, 0).len(), 5);
    }

    #[test]
    fn vertices_lie_on_the_radius() {
        let radius = km_to_degrees(10.0);
        for p in build_circle(CENTER, 10.0, DEFAULT_RESOLUTION).vertices() {
            let d = (p.latitude - CENTER.latitude).hypot(p.longitude - CENTER.longitude);
            assert!((d - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn first_vertex_is_due_north() {
        let aoi = build_circle(CENTER, 10.0, DEFAULT_RESOLUTION);
        let first = aoi.vertices()[0];
        assert!((first.latitude - (CENTER.latitude + km_to_degrees(10.0))).abs() < 1e-12);
        assert!((first.longitude - CENTER.longitude).abs() < 1e-12);
    }

    #[test]
    fn non_positive_radius_yields_empty_area() {
        assert!(build_circle(CENTER, 0.0, 4).is_empty());
        assert!(build_circle(CENTER, -5.0, 4).is_empty());
        assert!(build_circle(CENTER, f64::NAN, 4).is_empty());
    }

    #[test]
    fn polygon_contains_center() {
        let polygon = to_polygon(&build_circle(CENTER, 10.0, DEFAULT_RESOLUTION));
        assert!(polygon.contains(&Point::new(CENTER.longitude, CENTER.latitude)));
        assert!(!polygon.contains(&Point::new(CENTER.longitude + 1.0, CENTER.latitude)));
    }

    #[test]
    fn geojson_uses_lng_lat_order() {
        let aoi = build_circle(CENTER, 10.0, 1);
        let geometry = to_geojson(&aoi);
        let geojson::Value::Polygon(rings) = geometry.value else {
            panic!("expected a polygon geometry");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
        assert!((rings[0][0][0] - CENTER.longitude).abs() < 1e-12);
    }
}
