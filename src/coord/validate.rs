//! Coordinate validation at trust boundaries
//!
//! Every coordinate that comes from outside the process (provider payloads,
//! persisted history, user input) passes through here before it is used for
//! navigation, rendering or persistence. The base check is numeric only:
//! provider coordinates are not rejected for being outside a regional box.

use crate::coord::{BoundingBox, Coordinates};
use serde::{Deserialize, Serialize};

/// A coordinate as received from an untrusted source
///
/// Either component may be missing or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl RawCoordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// The coordinate, if both components are present and finite
    pub fn validated(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coordinates::new(lat, lng);
                is_valid(Some(&coords)).then_some(coords)
            }
            _ => None,
        }
    }
}

/// True iff the point exists and both components are finite numbers
pub fn is_valid(point: Option<&Coordinates>) -> bool {
    point.is_some_and(Coordinates::is_finite)
}

/// Numeric validity plus containment in `bounds`
pub fn is_valid_within(point: Option<&Coordinates>, bounds: &BoundingBox) -> bool {
    point.is_some_and(|p| p.is_finite() && bounds.contains(*p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::region::NEARBY_SANITY_BOUNDS;

    #[test]
    fn test_validator_totality() {
        assert!(!is_valid(Some(&Coordinates::new(f64::NAN, 24.0))));
        assert!(!is_valid(Some(&Coordinates::new(24.0, f64::INFINITY))));
        assert!(!is_valid(None));
        assert!(is_valid(Some(&Coordinates::new(56.95, 24.1))));
    }

    #[test]
    fn test_out_of_region_is_still_valid() {
        // Far outside Latvia but a perfectly good number pair
        assert!(is_valid(Some(&Coordinates::new(-33.9, 151.2))));
        assert!(!is_valid_within(
            Some(&Coordinates::new(-33.9, 151.2)),
            &NEARBY_SANITY_BOUNDS
        ));
    }

    #[test]
    fn test_raw_coordinates() {
        assert_eq!(
            RawCoordinates::new(56.0, 25.0).validated(),
            Some(Coordinates::new(56.0, 25.0))
        );
        assert_eq!(RawCoordinates::new(f64::NAN, 25.0).validated(), None);
        assert_eq!(
            RawCoordinates {
                lat: Some(56.0),
                lng: None
            }
            .validated(),
            None
        );
    }

    #[test]
    fn test_raw_coordinates_from_json_nulls() {
        let raw: RawCoordinates = serde_json::from_str(r#"{"lat": null, "lng": 24.0}"#).unwrap();
        assert_eq!(raw.validated(), None);

        let raw: RawCoordinates = serde_json::from_str(r#"{"lng": 24.0}"#).unwrap();
        assert_eq!(raw.validated(), None);

        let raw: RawCoordinates = serde_json::from_str(r#"{"lat": 56.9, "lng": 24.0}"#).unwrap();
        assert_eq!(raw.validated(), Some(Coordinates::new(56.9, 24.0)));
    }
}
