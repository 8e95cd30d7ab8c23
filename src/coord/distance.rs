//! Great-circle distance and distance labels
//!
//! Labels use meters below 1 km ("640 m") and kilometers with one decimal
//! otherwise ("2.4 km"). The threshold and precision are fixed.

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::coord::Coordinates;

/// Calculate the distance between two points in kilometers (Haversine formula)
///
/// Symmetric, and exactly 0 for identical points.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Render a distance in kilometers as a short label
///
/// Meters are rounded after the 1 km split, so anything in [0.9995, 1.0) km
/// reads "1000 m" rather than "1.0 km".
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{:.1} km", km)
    }
}

/// Distance label between two points
pub fn distance_label(a: Coordinates, b: Coordinates) -> String {
    format_distance(haversine_km(a, b))
}

/// Parse a label back into meters for ordering
///
/// "500 m" sorts as 500, "2.0 km" as 2000. Anything unparsable sorts last.
pub fn label_meters(label: &str) -> f64 {
    let label = label.trim();
    let (number, scale) = if let Some(km) = label.strip_suffix("km") {
        (km, 1000.0)
    } else if let Some(m) = label.strip_suffix('m') {
        (m, 1.0)
    } else {
        (label, 1.0)
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * scale)
        .unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinates::new(56.0, 24.0);
        let b = Coordinates::new(57.0, 24.0);

        // 6371 * pi / 180
        assert_relative_eq!(haversine_km(a, b), 111.195, epsilon = 0.01);
    }

    #[test]
    fn test_distance_zero_law() {
        let a = Coordinates::new(56.95, 24.1);
        assert_eq!(haversine_km(a, a), 0.0);
        assert_eq!(distance_label(a, a), "0 m");
    }

    #[test]
    fn test_distance_symmetry() {
        let pairs = [
            (Coordinates::new(56.95, 24.1), Coordinates::new(57.15, 24.85)),
            (Coordinates::new(55.67, 26.6), Coordinates::new(57.87, 24.35)),
            (Coordinates::new(-33.9, 151.2), Coordinates::new(51.5, -0.12)),
        ];

        for (a, b) in pairs {
            assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_format_boundary() {
        assert_eq!(format_distance(0.9996), "1000 m");
        assert_eq!(format_distance(0.9994), "999 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(12.345), "12.3 km");
    }

    #[test]
    fn test_label_meters() {
        assert_eq!(label_meters("500 m"), 500.0);
        assert_eq!(label_meters("2.0 km"), 2000.0);
        assert_eq!(label_meters("0.9 km"), 900.0);
        assert_eq!(label_meters("  12 m "), 12.0);
        assert_eq!(label_meters("far away"), f64::INFINITY);
    }

    #[test]
    fn test_label_ordering_matches_distance() {
        let labels = ["1.2 km", "999 m", "30 m", "10.0 km"];
        let mut sorted = labels.to_vec();
        sorted.sort_by(|a, b| label_meters(a).total_cmp(&label_meters(b)));
        assert_eq!(sorted, vec!["30 m", "999 m", "1.2 km", "10.0 km"]);
    }
}
