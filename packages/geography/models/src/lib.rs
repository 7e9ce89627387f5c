#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic point and area-of-interest types.
//!
//! Points are stored in `(latitude, longitude)` order. Anything that
//! serializes these types for an external system (WKT, `GeoJSON`) is
//! responsible for emitting the axis order that system expects.

use serde::{Deserialize, Serialize};

/// Minimum number of vertices in a valid closed ring (a triangle plus the
/// repeated closing vertex).
pub const MIN_RING_LEN: usize = 4;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A closed polygon ring used as a geospatial search filter.
///
/// Built fresh for every query and owned by the caller. A ring produced
/// from a non-positive radius is empty; use [`Self::is_degenerate`] to
/// detect rings that cannot be sent as a polygon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    ring: Vec<GeoPoint>,
}

impl AreaOfInterest {
    /// Wraps a ring of vertices, closing it if the last vertex does not
    /// already repeat the first.
    #[must_use]
    pub fn from_ring(mut ring: Vec<GeoPoint>) -> Self {
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied())
            && first != last
        {
            ring.push(first);
        }
        Self { ring }
    }

    /// An area with no vertices.
    #[must_use]
    pub const fn empty() -> Self {
        Self { ring: Vec::new() }
    }

    /// The vertices of the ring, first vertex repeated last.
    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Number of vertices, including the closing vertex.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether the ring has no vertices at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Whether the first and last vertices coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// `true` when the ring is too short or not closed and therefore does
    /// not describe a polygon.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.ring.len() < MIN_RING_LEN || !self.is_closed()
    }

    /// Serializes the ring as a WKT polygon literal.
    ///
    /// WKT uses `x y` ordering, so each vertex is written as
    /// `longitude latitude`, the reverse of [`GeoPoint`]'s field order.
    #[must_use]
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .ring
            .iter()
            .map(|p| format!("{} {}", p.longitude, p.latitude))
            .collect();
        format!("POLYGON(({}))", coords.join(","))
    }

    /// Renders one `"latitude, longitude"` line per vertex, the format
    /// accepted by most lat/long map plotting sites.
    #[must_use]
    pub fn to_lat_lng_lines(&self) -> String {
        self.ring
            .iter()
            .map(|p| format!("{}, {}", p.latitude, p.longitude))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
