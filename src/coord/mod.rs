//! Coordinate geometry
//!
//! This module handles:
//! - Point-in-polygon tests against the Latvia border
//! - Rejection sampling of random points inside the border
//! - Great-circle distances and their display labels
//! - Numeric validation of coordinates from untrusted sources

pub mod distance;
pub mod region;
pub mod sampler;
pub mod validate;

use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// The degenerate `(0, 0)` point some providers emit instead of "unknown"
    pub fn is_null_island(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.is_finite() {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "({}, {}) is not a finite coordinate",
                self.lat, self.lng
            )));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// An axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Inclusive containment test
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Map two unit floats onto a point inside the box
    pub fn interpolate(&self, u_lat: f64, u_lng: f64) -> Coordinates {
        Coordinates::new(
            self.min_lat + u_lat * (self.max_lat - self.min_lat),
            self.min_lng + u_lng * (self.max_lng - self.min_lng),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinates::new(56.95, 24.1).validate().is_ok());
        assert!(Coordinates::new(91.0, 24.1).validate().is_err());
        assert!(Coordinates::new(56.95, -181.0).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 24.1).validate().is_err());
    }

    #[test]
    fn test_null_island() {
        assert!(Coordinates::new(0.0, 0.0).is_null_island());
        assert!(!Coordinates::new(0.0, 24.0).is_null_island());
    }

    #[test]
    fn test_bounding_box_interpolate_corners() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 20.0,
            min_lng: 30.0,
            max_lng: 50.0,
        };

        assert_eq!(bbox.interpolate(0.0, 0.0), Coordinates::new(10.0, 30.0));
        assert_eq!(bbox.interpolate(0.5, 0.5), Coordinates::new(15.0, 40.0));
        assert!(bbox.contains(bbox.interpolate(0.999, 0.999)));
        assert!(!bbox.contains(Coordinates::new(9.9, 40.0)));
    }
}
