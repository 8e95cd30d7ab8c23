//! Latvia border polygon and point-in-polygon test

use crate::coord::Coordinates;

/// An ordered ring of `(lat, lng)` vertices approximating a country border
///
/// The ring must have at least 3 vertices and should not self-intersect;
/// neither is checked at runtime.
pub type RegionPolygon = [(f64, f64)];

/// Latvian border, clockwise from Ainaži
///
/// Traced closely enough along the eastern and southern land borders that
/// sampled points do not land in Estonia, Russia, Belarus or Lithuania.
pub const LATVIA_POLYGON: [(f64, f64); 33] = [
    // Estonian border
    (57.87, 24.35), // Ainaži
    (57.85, 25.00), // Mazsalaca
    (57.60, 26.00),
    (57.75, 26.10), // Valka
    (57.50, 26.70), // Ape
    (57.55, 27.40), // Alūksne
    // Russian border
    (57.40, 27.70), // Viļaka
    (56.90, 28.10), // Kārsava
    (56.60, 28.10), // Ludza
    (56.40, 28.25), // Zilupe
    // Belarusian border
    (56.15, 28.15),
    (55.90, 27.60), // Piedruja
    (55.80, 27.00),
    (55.67, 26.60), // Demene
    // Lithuanian border
    (56.00, 26.00), // Subate
    (56.10, 25.50), // Nereta
    (56.30, 24.50), // Bauska
    (56.40, 24.10),
    (56.35, 23.30),
    (56.25, 22.50),
    (56.40, 22.10),
    (56.15, 21.30),
    (56.05, 21.05), // Rucava
    // Baltic coast
    (56.50, 21.00), // Liepāja
    (57.00, 21.00), // Pāvilosta
    (57.40, 21.55), // Ventspils
    (57.75, 22.60), // Kolka
    // Gulf of Riga
    (57.35, 22.90), // Roja
    (57.33, 23.12), // Mērsrags
    (57.05, 23.20), // Engure
    (56.95, 23.60), // Jūrmala
    (57.03, 24.03), // Daugava mouth
    (57.15, 24.40), // Saulkrasti
];

/// Crossing-number test: is `point` inside `polygon`?
///
/// Casts a ray from the point along the latitude axis and toggles on every
/// edge it crosses. Points exactly on an edge may classify either way.
pub fn is_inside_region(point: Coordinates, polygon: &RegionPolygon) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];

        let straddles = (yi > point.lng) != (yj > point.lng);
        if straddles && point.lat < (xj - xi) * (point.lng - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Convenience wrapper against the Latvian border
pub fn is_in_latvia(point: Coordinates) -> bool {
    is_inside_region(point, &LATVIA_POLYGON)
}
