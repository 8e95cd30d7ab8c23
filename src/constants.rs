//! Centralized constants for the latvia-explorer crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// Latvia-specific geometry
pub mod region {
    use crate::coord::{BoundingBox, Coordinates};

    /// Box that random seeds are drawn from (slightly tighter than the country envelope)
    pub const GENERATION_BOUNDS: BoundingBox = BoundingBox {
        min_lat: 55.70,
        max_lat: 57.85,
        min_lng: 21.05,
        max_lng: 28.20,
    };

    /// Loose envelope nearby places must fall inside
    pub const NEARBY_SANITY_BOUNDS: BoundingBox = BoundingBox {
        min_lat: 53.70,
        max_lat: 59.85,
        min_lng: 19.05,
        max_lng: 30.20,
    };

    /// Sigulda, used when rejection sampling runs out of attempts
    pub const FALLBACK_POINT: Coordinates = Coordinates {
        lat: 57.1537,
        lng: 24.8505,
    };

    /// Rīga, the initial map center
    pub const INITIAL_CENTER: Coordinates = Coordinates {
        lat: 56.9496,
        lng: 24.1052,
    };

    /// Initial map zoom
    pub const INITIAL_ZOOM: u8 = 7;

    /// Region names the content provider may return
    pub const REGION_NAMES: [&str; 6] = ["Kurzeme", "Vidzeme", "Latgale", "Zemgale", "Sēlija", "Rīga"];
}

/// External API endpoints
pub mod api {
    /// Google Generative Language API
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

    /// Model used for content generation
    pub const GEMINI_MODEL: &str = "gemini-3-flash-preview";
}

/// Persistence settings
pub mod storage {
    /// Application directory name (for XDG paths)
    pub const APP_DIR_NAME: &str = "latvia-explorer";

    /// History file name
    pub const HISTORY_FILE_NAME: &str = "latvia_explorer_history.json";

    /// Maximum number of history entries kept
    pub const MAX_HISTORY_ENTRIES: usize = 50;
}
