//! Geographic bounding boxes for image overlays.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
///
/// Corners are normalized on construction so `min_*` is never greater than
/// `max_*`, regardless of the order the API sends them in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat: min_lat.min(max_lat),
            min_lon: min_lon.min(max_lon),
            max_lat: min_lat.max(max_lat),
            max_lon: min_lon.max(max_lon),
        }
    }

    /// Build from a `[[lat, lon], [lat, lon]]` corner pair as used by image overlays.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Self {
        let [[lat_a, lon_a], [lat_b, lon_b]] = corners;
        Self::new(lat_a, lon_a, lat_b, lon_b)
    }

    /// Like [`from_corners`](Self::from_corners), but `None` unless every
    /// coordinate is a finite, in-range latitude or longitude.
    pub fn from_valid_corners(corners: [[f64; 2]; 2]) -> Option<Self> {
        let [[lat_a, lon_a], [lat_b, lon_b]] = corners;
        let raw = Self {
            min_lat: lat_a,
            min_lon: lon_a,
            max_lat: lat_b,
            max_lon: lon_b,
        };
        raw.is_valid().then(|| Self::from_corners(corners))
    }

    /// Corner pair in `[[south, west], [north, east]]` order.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }

    /// Whether all four edges are finite latitude/longitude values.
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.max_lat]
            .iter()
            .all(|v| v.is_finite() && (-90.0..=90.0).contains(v))
            && [self.min_lon, self.max_lon]
                .iter()
                .all(|v| v.is_finite() && (-180.0..=180.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_order() {
        let bbox = BoundingBox::from_corners([[40.0, -100.0], [30.0, -120.0]]);
        assert_eq!(bbox.min_lat, 30.0);
        assert_eq!(bbox.min_lon, -120.0);
        assert_eq!(bbox.max_lat, 40.0);
        assert_eq!(bbox.max_lon, -100.0);
    }

    #[test]
    fn test_valid_corners_are_normalized() {
        let bbox = BoundingBox::from_valid_corners([[30.0, 20.0], [10.0, -20.0]]).unwrap();
        assert_eq!(bbox.corners(), [[10.0, -20.0], [30.0, 20.0]]);
    }

    #[test]
    fn test_invalid_corners_rejected() {
        assert!(BoundingBox::from_valid_corners([[10.0, -20.0], [91.0, 20.0]]).is_none());
        assert!(BoundingBox::from_valid_corners([[10.0, -181.0], [30.0, 20.0]]).is_none());
        assert!(BoundingBox::from_valid_corners([[f64::NAN, -20.0], [30.0, 20.0]]).is_none());
        assert!(BoundingBox::from_valid_corners([[10.0, f64::INFINITY], [30.0, 20.0]]).is_none());
    }
}
