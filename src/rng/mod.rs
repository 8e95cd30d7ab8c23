//! Random number sources
//!
//! The sampler draws uniform floats through the `RandomSource` trait so that
//! tests can swap in a seeded generator.

pub mod pseudo;

/// A source of uniformly distributed floats
///
/// Implementations must be thread-safe (Send + Sync) to work with async server.
pub trait RandomSource: Send + Sync {
    /// Returns the source name (e.g., "thread", "seeded")
    fn name(&self) -> &'static str;

    /// Generate a single random float uniformly distributed in [0.0, 1.0)
    fn next_f64(&self) -> f64;
}

/// Get a source by name, seeded when a seed is given
pub fn get_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(pseudo::SeededSource::new(seed)),
        None => Box::new(pseudo::ThreadSource::new()),
    }
}
