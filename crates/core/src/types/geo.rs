//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair.
///
/// Serializes as a two-element JSON array, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    /// Degrees east.
    pub longitude: f64,
    /// Degrees north.
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.longitude, point.latitude]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_longitude_first() {
        let point = GeoPoint::new(-73.97, 40.77);
        assert_eq!(serde_json::to_string(&point).unwrap(), "[-73.97,40.77]");
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert!(serde_json::from_str::<GeoPoint>("[1.0]").is_err());
        assert!(serde_json::from_str::<GeoPoint>("[1.0, 2.0, 3.0]").is_err());
        let point: GeoPoint = serde_json::from_str("[1.5, 2.5]").unwrap();
        assert_eq!(point, GeoPoint::new(1.5, 2.5));
    }
}
