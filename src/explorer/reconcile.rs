//! Reconciliation of untrusted provider answers
//!
//! Turns a `ProviderResponse` and the seed it was asked about into a
//! `ResolvedLocation`. Every coordinate in the answer is validated here;
//! nothing the provider computed (distances in particular) is trusted.

use super::{NearbyPlace, ResolvedLocation};
use crate::constants::region::NEARBY_SANITY_BOUNDS;
use crate::coord::distance::{distance_label, label_meters};
use crate::coord::validate::{is_valid_within, RawCoordinates};
use crate::coord::{BoundingBox, Coordinates};
use crate::provider::{CandidateSource, ProviderResponse, RawNearbyPlace, Source};
use chrono::Utc;
use reqwest::Url;
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum number of sources kept from grounding metadata
pub const MAX_SOURCES: usize = 3;

/// Title given to the official website when it is added to the sources
pub const OFFICIAL_WEBSITE_TITLE: &str = "Oficiālā mājaslapa";

/// Knobs for a single reconciliation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileOptions {
    /// Nearby places kept after sorting
    pub nearby_limit: usize,
    /// Coarse envelope nearby places must fall inside
    pub sanity_bounds: BoundingBox,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            nearby_limit: 5,
            sanity_bounds: NEARBY_SANITY_BOUNDS,
        }
    }
}

/// Build the resolved location for one successful provider call
pub fn reconcile(
    seed: Coordinates,
    target_name: Option<String>,
    response: ProviderResponse,
    options: &ReconcileOptions,
) -> ResolvedLocation {
    let ProviderResponse { payload, sources } = response;

    let final_coordinate = resolve_final_coordinate(seed, payload.exact_coordinates.as_ref());
    let nearby_places = reconcile_nearby(final_coordinate, payload.nearby_places, options);
    let sources = select_sources(
        sources,
        payload.website.as_deref(),
        payload.is_official_website.unwrap_or(false),
    );

    debug!(
        title = %payload.title,
        lat = final_coordinate.lat,
        lng = final_coordinate.lng,
        nearby = nearby_places.len(),
        sources = sources.len(),
        "Reconciled provider answer"
    );

    ResolvedLocation {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        seed_coordinate: seed,
        final_coordinate,
        target_name,
        title: payload.title,
        description: payload.description,
        facts: payload.facts,
        location_type: payload.location_type,
        region: payload.region,
        nearby_places,
        sources,
        website: payload.website,
    }
}

/// Prefer the provider's exact coordinate, fall back to the seed
///
/// The exact coordinate is ignored when missing, non-finite, or `(0, 0)`.
pub fn resolve_final_coordinate(seed: Coordinates, exact: Option<&RawCoordinates>) -> Coordinates {
    let Some(raw) = exact else {
        debug!("No exact coordinate in answer, using seed");
        return seed;
    };

    match raw.validated() {
        Some(coords) if !coords.is_null_island() => coords,
        Some(_) => {
            warn!("Provider returned (0, 0) as exact coordinate, using seed");
            seed
        }
        None => {
            warn!(?raw, "Provider returned an invalid exact coordinate, using seed");
            seed
        }
    }
}

/// Validate, re-label, sort and truncate nearby places
///
/// Distances are recomputed from `anchor`. Places whose coordinates are
/// invalid or fall outside the sanity envelope are dropped.
pub fn reconcile_nearby(
    anchor: Coordinates,
    candidates: Vec<RawNearbyPlace>,
    options: &ReconcileOptions,
) -> Vec<NearbyPlace> {
    let total = candidates.len();

    let mut places: Vec<NearbyPlace> = candidates
        .into_iter()
        .filter_map(|place| {
            let coords = place.coordinates.as_ref().and_then(RawCoordinates::validated);
            if !is_valid_within(coords.as_ref(), &options.sanity_bounds) {
                debug!(name = %place.name, "Discarding nearby place with unusable coordinates");
                return None;
            }
            let coords = coords?;

            Some(NearbyPlace {
                name: place.name,
                place_type: place.place_type,
                distance: distance_label(anchor, coords),
                coordinates: coords,
            })
        })
        .collect();

    if places.len() < total {
        warn!(
            discarded = total - places.len(),
            total, "Discarded nearby places with invalid coordinates"
        );
    }

    // Stable, so equal labels keep provider order
    places.sort_by(|a, b| label_meters(&a.distance).total_cmp(&label_meters(&b.distance)));
    places.truncate(options.nearby_limit);
    places
}

/// Host of a URI with a leading `www.` removed
fn domain_of(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Pick the sources shown with a location
///
/// Candidates without a URI are dropped and the rest deduplicated by domain
/// (URIs that do not parse are always kept) up to `MAX_SOURCES`. A website
/// the model flagged as official is put first unless a kept source already
/// points at its domain.
pub fn select_sources(
    candidates: Vec<CandidateSource>,
    website: Option<&str>,
    official: bool,
) -> Vec<Source> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for candidate in candidates {
        let Some(uri) = candidate.uri.filter(|u| !u.is_empty()) else {
            continue;
        };

        if let Some(domain) = domain_of(&uri) {
            if !seen.insert(domain) {
                continue;
            }
        }

        let title = candidate
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| uri.clone());
        sources.push(Source { uri, title });

        if sources.len() >= MAX_SOURCES {
            break;
        }
    }

    if let Some(site) = website.filter(|w| official && w.starts_with("http")) {
        if let Some(domain) = domain_of(site) {
            if !sources.iter().any(|s| s.uri.contains(&domain)) {
                sources.insert(
                    0,
                    Source {
                        uri: site.to_string(),
                        title: OFFICIAL_WEBSITE_TITLE.to_string(),
                    },
                );
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{LocationPayload, LocationType};

    fn payload(exact: Option<RawCoordinates>, nearby: Vec<RawNearbyPlace>) -> LocationPayload {
        LocationPayload {
            title: "Vieta".to_string(),
            description: "Apraksts".to_string(),
            facts: Vec::new(),
            location_type: LocationType::Nature,
            region: None,
            exact_coordinates: exact,
            nearby_places: nearby,
            website: None,
            is_official_website: None,
        }
    }

    fn response(exact: Option<RawCoordinates>, nearby: Vec<RawNearbyPlace>) -> ProviderResponse {
        ProviderResponse {
            payload: payload(exact, nearby),
            sources: Vec::new(),
        }
    }

    fn nearby(name: &str, lat: f64, lng: f64, distance: &str) -> RawNearbyPlace {
        RawNearbyPlace {
            name: name.to_string(),
            place_type: "Nature".to_string(),
            distance: Some(distance.to_string()),
            coordinates: Some(RawCoordinates::new(lat, lng)),
        }
    }

    fn candidate(uri: &str, title: &str) -> CandidateSource {
        CandidateSource {
            uri: Some(uri.to_string()),
            title: Some(title.to_string()),
        }
    }

    const SEED: Coordinates = Coordinates::new(56.5, 25.5);

    #[test]
    fn test_exact_coordinate_takes_precedence() {
        let resolved = reconcile(
            SEED,
            None,
            response(Some(RawCoordinates::new(56.0, 25.0)), Vec::new()),
            &ReconcileOptions::default(),
        );

        assert_eq!(resolved.final_coordinate, Coordinates::new(56.0, 25.0));
        assert_eq!(resolved.seed_coordinate, SEED);
    }

    #[test]
    fn test_null_island_falls_back_to_seed() {
        let resolved = reconcile(
            SEED,
            None,
            response(Some(RawCoordinates::new(0.0, 0.0)), Vec::new()),
            &ReconcileOptions::default(),
        );
        assert_eq!(resolved.final_coordinate, SEED);
    }

    #[test]
    fn test_invalid_exact_coordinate_falls_back_to_seed() {
        let resolved = reconcile(
            SEED,
            None,
            response(Some(RawCoordinates::new(f64::NAN, 25.0)), Vec::new()),
            &ReconcileOptions::default(),
        );
        assert_eq!(resolved.final_coordinate, SEED);

        let half = RawCoordinates {
            lat: Some(56.0),
            lng: None,
        };
        assert_eq!(resolve_final_coordinate(SEED, Some(&half)), SEED);
        assert_eq!(resolve_final_coordinate(SEED, None), SEED);
    }

    #[test]
    fn test_nearby_sorted_and_relabelled() {
        // ~2.0 km and ~500 m north of the exact coordinate, with misleading labels
        let places = vec![
            nearby("Tālais", 56.018, 25.0, "100 m"),
            nearby("Tuvais", 56.004497, 25.0, "9 km"),
        ];
        let resolved = reconcile(
            SEED,
            None,
            response(Some(RawCoordinates::new(56.0, 25.0)), places),
            &ReconcileOptions::default(),
        );

        let names: Vec<_> = resolved.nearby_places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Tuvais", "Tālais"]);
        assert_eq!(resolved.nearby_places[0].distance, "500 m");
        assert_eq!(resolved.nearby_places[1].distance, "2.0 km");
    }

    #[test]
    fn test_nearby_anchor_is_final_coordinate() {
        // Exact coordinate rejected, so distances come from the seed
        let places = vec![nearby("Blakus", 56.5, 25.5, "5 km")];
        let resolved = reconcile(
            SEED,
            None,
            response(Some(RawCoordinates::new(0.0, 0.0)), places),
            &ReconcileOptions::default(),
        );
        assert_eq!(resolved.nearby_places[0].distance, "0 m");
    }

    #[test]
    fn test_nearby_invalid_and_implausible_discarded() {
        let places = vec![
            nearby("NaN", f64::NAN, 25.0, "1 km"),
            nearby("Sidneja", -33.9, 151.2, "1 km"),
            RawNearbyPlace {
                name: "Bez koordinātām".to_string(),
                place_type: "Other".to_string(),
                distance: None,
                coordinates: None,
            },
            // Just across the border, still plausible
            nearby("Valga", 57.7775, 26.0473, "1 km"),
        ];

        let kept = reconcile_nearby(SEED, places, &ReconcileOptions::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Valga");
    }

    #[test]
    fn test_nearby_truncated_to_limit() {
        let places: Vec<_> = (0..8)
            .map(|i| nearby(&format!("P{}", i), 56.5 + 0.01 * f64::from(i), 25.5, ""))
            .collect();
        let options = ReconcileOptions {
            nearby_limit: 3,
            ..ReconcileOptions::default()
        };

        let kept = reconcile_nearby(SEED, places, &options);
        let names: Vec<_> = kept.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["P0", "P1", "P2"]);
    }

    #[test]
    fn test_sources_deduplicated_and_capped() {
        let candidates = vec![
            candidate("https://www.latvia.travel/lv/turaida", "Latvia Travel"),
            candidate("https://latvia.travel/en/sigulda", "Latvia Travel EN"),
            CandidateSource {
                uri: None,
                title: Some("Bez saites".to_string()),
            },
            candidate("https://lv.wikipedia.org/wiki/Turaida", "Vikipēdija"),
            candidate("not a url", "Nezināms"),
            candidate("https://turaida-muzejs.lv", "Muzejs"),
        ];

        let sources = select_sources(candidates, None, false);
        let uris: Vec<_> = sources.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "https://www.latvia.travel/lv/turaida",
                "https://lv.wikipedia.org/wiki/Turaida",
                "not a url",
            ]
        );
    }

    #[test]
    fn test_missing_title_uses_uri() {
        let sources = select_sources(
            vec![CandidateSource {
                uri: Some("https://sigulda.lv".to_string()),
                title: None,
            }],
            None,
            false,
        );
        assert_eq!(sources[0].title, "https://sigulda.lv");
    }

    #[test]
    fn test_official_website_prepended() {
        let sources = select_sources(
            vec![candidate("https://lv.wikipedia.org/wiki/Rundāle", "Vikipēdija")],
            Some("https://www.rundale.net"),
            true,
        );

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].uri, "https://www.rundale.net");
        assert_eq!(sources[0].title, OFFICIAL_WEBSITE_TITLE);
    }

    #[test]
    fn test_official_website_rules() {
        let grounded = vec![candidate("https://rundale.net/lv/", "Rundāles pils")];

        // Already cited
        assert_eq!(
            select_sources(grounded.clone(), Some("https://www.rundale.net"), true).len(),
            1
        );
        // Not flagged as official
        assert_eq!(select_sources(Vec::new(), Some("https://rundale.net"), false).len(), 0);
        // Not an http URL
        assert_eq!(select_sources(Vec::new(), Some("rundale.net"), true).len(), 0);
    }

    #[test]
    fn test_resolved_location_metadata() {
        let mut response = response(Some(RawCoordinates::new(56.0, 25.0)), Vec::new());
        response.payload.website = Some("https://example.lv".to_string());

        let resolved = reconcile(
            SEED,
            Some("Rundāles pils".to_string()),
            response,
            &ReconcileOptions::default(),
        );

        assert_eq!(resolved.target_name.as_deref(), Some("Rundāles pils"));
        assert_eq!(resolved.website.as_deref(), Some("https://example.lv"));
        assert!(Uuid::parse_str(&resolved.id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&resolved.timestamp).is_ok());
    }
}
