//! Pseudo-random sources
//!
//! `ThreadSource` uses the `rand` crate's thread-local RNG. `SeededSource`
//! is deterministic for a given seed and is what tests use.

use crate::rng::RandomSource;
use rand::Rng;
use std::sync::Mutex;

/// Thread-local pseudo-random source
#[derive(Debug, Default)]
pub struct ThreadSource;

impl ThreadSource {
    /// Create a new thread-local source
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadSource {
    fn name(&self) -> &'static str {
        "thread"
    }

    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded pseudo-random source for deterministic testing
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<rand::rngs::StdRng>,
}

impl SeededSource {
    /// Create a new seeded source
    ///
    /// Using the same seed will produce the same sequence of random values.
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            rng: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededSource {
    fn name(&self) -> &'static str {
        "seeded"
    }

    fn next_f64(&self) -> f64 {
        // A poisoned lock still holds a usable RNG state
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(source: &dyn RandomSource, n: usize) -> Vec<f64> {
        (0..n).map(|_| source.next_f64()).collect()
    }

    #[test]
    fn test_thread_source_in_range() {
        for f in draw(&ThreadSource::new(), 100) {
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_seeded_source_reproducible() {
        let a = SeededSource::new(42);
        let b = SeededSource::new(42);

        assert_eq!(draw(&a, 50), draw(&b, 50));
    }

    #[test]
    fn test_seeded_sources_differ_by_seed() {
        let a = SeededSource::new(1);
        let b = SeededSource::new(2);

        assert_ne!(draw(&a, 10), draw(&b, 10));
    }

    #[test]
    fn test_get_source_names() {
        assert_eq!(crate::rng::get_source(None).name(), "thread");
        assert_eq!(crate::rng::get_source(Some(7)).name(), "seeded");
    }
}
