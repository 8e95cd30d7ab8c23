//! latvia-explorer: random and searched places in Latvia
//!
//! A library and CLI tool that picks a point inside Latvia (or takes a place
//! name), asks a web-grounded AI model what is there, and checks the answer
//! before showing it.
//!
//! ## Features
//!
//! - Rejection sampling of uniform points inside the Latvia border
//! - Gemini content provider with Google Search grounding
//! - Reconciliation of model output: coordinate precedence, locally computed
//!   nearby distances, deduplicated sources
//! - Stale query detection with sequenced tickets
//! - Persistent history, HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use latvia_explorer::coord::distance::distance_label;
//! use latvia_explorer::coord::region::is_in_latvia;
//! use latvia_explorer::coord::sampler::sample_random_point;
//! use latvia_explorer::rng::pseudo::SeededSource;
//! use latvia_explorer::Coordinates;
//!
//! let rng = SeededSource::new(42);
//! let point = sample_random_point(500, &rng);
//! assert!(is_in_latvia(point));
//!
//! let riga = Coordinates::new(56.9496, 24.1052);
//! println!("{} from Riga", distance_label(riga, point));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod explorer;
pub mod format;
pub mod history;
pub mod provider;
pub mod rng;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use explorer::{ExploreRequest, Explorer, ResolvedLocation};
pub use provider::ContentProvider;
