//! Random points inside a region
//!
//! Rejection sampling: draw uniformly from the bounding box, keep the first
//! draw the polygon accepts. The attempt budget is bounded and running out
//! falls back to a fixed interior point, so callers always get a coordinate.

use crate::constants::region::{FALLBACK_POINT, GENERATION_BOUNDS};
use crate::coord::region::{is_inside_region, RegionPolygon, LATVIA_POLYGON};
use crate::coord::{BoundingBox, Coordinates};
use crate::rng::RandomSource;
use tracing::warn;

/// Default attempt budget before falling back
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Where a sampled point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Accepted by the polygon test after this many draws
    Accepted { attempts: usize },
    /// The budget ran out and the fixed fallback point was used
    Exhausted,
}

/// Sample a point inside `polygon`, drawing from `bounds`
///
/// # Arguments
/// * `bounds` - Box to draw candidates from
/// * `polygon` - Region the point must fall inside
/// * `max_attempts` - Draws allowed before using `fallback`
/// * `fallback` - Known-good interior point
/// * `rng` - Random source
pub fn sample_point_in(
    bounds: &BoundingBox,
    polygon: &RegionPolygon,
    max_attempts: usize,
    fallback: Coordinates,
    rng: &dyn RandomSource,
) -> (Coordinates, SampleOutcome) {
    for attempt in 1..=max_attempts {
        let candidate = bounds.interpolate(rng.next_f64(), rng.next_f64());
        if is_inside_region(candidate, polygon) {
            return (candidate, SampleOutcome::Accepted { attempts: attempt });
        }
    }

    warn!(
        max_attempts,
        "Could not sample a point inside the region, using fallback ({}, {})",
        fallback.lat,
        fallback.lng
    );
    (fallback, SampleOutcome::Exhausted)
}

/// Sample a random point inside Latvia
///
/// Returns the Sigulda fallback if `max_attempts` draws all miss.
pub fn sample_random_point(max_attempts: usize, rng: &dyn RandomSource) -> Coordinates {
    sample_point_in(
        &GENERATION_BOUNDS,
        &LATVIA_POLYGON,
        max_attempts,
        FALLBACK_POINT,
        rng,
    )
    .0
}

/// Sample `count` independent points inside Latvia
pub fn sample_points(count: usize, max_attempts: usize, rng: &dyn RandomSource) -> Vec<Coordinates> {
    (0..count)
        .map(|_| sample_random_point(max_attempts, rng))
        .collect()
}
