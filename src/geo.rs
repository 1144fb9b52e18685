//! Geographic Helpers
//!
//! Location parsing and marker preparation for the container map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::Container;

/// Map centre used before any marker is placed
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 19.766124583044522,
    lng: -97.24557469903733,
};

pub const DEFAULT_ZOOM: u8 = 16;

pub const COLLECTED_COLOR: &str = "#4CAF50";
pub const PENDING_COLOR: &str = "#F44336";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("expected \"lat lng\", got {0:?}")]
    Malformed(String),
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("coordinates out of range: {lat}, {lng}")]
    OutOfRange { lat: f64, lng: f64 },
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Parse the backend's `"lat lng"` encoding.
    ///
    /// Parts may be separated by whitespace and/or a comma; exactly two
    /// parts are required.
    pub fn parse(raw: &str) -> Result<Self, GeoError> {
        let parts: Vec<&str> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .collect();
        let [lat, lng] = parts.as_slice() else {
            return Err(GeoError::Malformed(raw.to_string()));
        };
        let lat: f64 = lat.parse().map_err(|_| GeoError::NotANumber(lat.to_string()))?;
        let lng: f64 = lng.parse().map_err(|_| GeoError::NotANumber(lng.to_string()))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::OutOfRange { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

impl FromStr for LatLng {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lat, self.lng)
    }
}

/// Bounding box, serialized as a Maps `LatLngBoundsLiteral`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn at(point: LatLng) -> Self {
        Self {
            north: point.lat,
            south: point.lat,
            east: point.lng,
            west: point.lng,
        }
    }

    pub fn extend(&mut self, point: LatLng) {
        self.north = self.north.max(point.lat);
        self.south = self.south.min(point.lat);
        self.east = self.east.max(point.lng);
        self.west = self.west.min(point.lng);
    }

    /// Smallest box holding every point; `None` for an empty set
    pub fn around(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::at(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }
}

/// Everything needed to draw one container marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub container_id: u32,
    pub position: LatLng,
    pub title: String,
    pub fill_color: &'static str,
    pub info: String,
}

impl MarkerSpec {
    pub fn for_container(container: &Container) -> Result<Self, GeoError> {
        let position = LatLng::parse(&container.location)?;
        let fill_color = if container.collected { COLLECTED_COLOR } else { PENDING_COLOR };
        Ok(Self {
            container_id: container.id,
            position,
            title: format!("Contenedor ID: {}", container.id),
            fill_color,
            info: format!(
                "<div><h3>Contenedor ID: {}</h3><p>Estado: {}</p></div>",
                container.id,
                container.status_label()
            ),
        })
    }
}

/// Markers for every container with a parseable location, in input order
pub fn marker_specs(containers: &[Container]) -> Vec<MarkerSpec> {
    containers
        .iter()
        .filter_map(|container| match MarkerSpec::for_container(container) {
            Ok(spec) => Some(spec),
            Err(err) => {
                warn!(container = container.id, %err, "skipping marker");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: u32, location: &str, collected: bool) -> Container {
        Container {
            id,
            location: location.to_string(),
            place: None,
            qr_code: format!("QR-{}", id),
            nfc_code: format!("NFC-{}", id),
            collected,
            updated_at: None,
            collection_point: None,
        }
    }

    #[test]
    fn test_parse_space_separated() {
        assert_eq!(LatLng::parse("19.8 -97.3"), Ok(LatLng { lat: 19.8, lng: -97.3 }));
        assert_eq!("  19.8   -97.3 ".parse::<LatLng>(), Ok(LatLng { lat: 19.8, lng: -97.3 }));
        assert_eq!(LatLng::parse("19.8, -97.3"), Ok(LatLng { lat: 19.8, lng: -97.3 }));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(LatLng::parse(""), Err(GeoError::Malformed(String::new())));
        assert!(matches!(LatLng::parse("19.8"), Err(GeoError::Malformed(_))));
        assert!(matches!(LatLng::parse("19.8 -97.3 5"), Err(GeoError::Malformed(_))));
        assert_eq!(LatLng::parse("north -97.3"), Err(GeoError::NotANumber("north".to_string())));
        assert!(matches!(LatLng::parse("91 10"), Err(GeoError::OutOfRange { .. })));
    }

    #[test]
    fn test_bounds_around_points() {
        let bounds = Bounds::around([
            LatLng { lat: 19.7, lng: -97.3 },
            LatLng { lat: 19.9, lng: -97.1 },
            LatLng { lat: 19.8, lng: -97.2 },
        ])
        .unwrap();

        assert_eq!(bounds.north, 19.9);
        assert_eq!(bounds.south, 19.7);
        assert_eq!(bounds.east, -97.1);
        assert_eq!(bounds.west, -97.3);
        assert!((bounds.center().lat - 19.8).abs() < 1e-9);
        assert_eq!(Bounds::around(Vec::new()), None);
    }

    #[test]
    fn test_marker_specs_skip_unparseable_locations() {
        let containers = vec![
            container(1, "19.8 -97.3", true),
            container(2, "sin ubicación", false),
            container(3, "19.7 -97.2", false),
        ];

        let specs = marker_specs(&containers);

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].container_id, 1);
        assert_eq!(specs[0].fill_color, COLLECTED_COLOR);
        assert_eq!(specs[0].title, "Contenedor ID: 1");
        assert_eq!(specs[1].container_id, 3);
        assert_eq!(specs[1].fill_color, PENDING_COLOR);
        assert!(specs[1].info.contains("Pendiente"));
    }
}
