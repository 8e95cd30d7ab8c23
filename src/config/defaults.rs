//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Rejection-sampling attempts before falling back to the fixed point
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Nearby places kept for a random query
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// Nearby places kept for a query with a target name
pub const DEFAULT_TARGETED_NEARBY_LIMIT: usize = 3;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Provider request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Zoom used for map links to a resolved place
pub const DEFAULT_URL_ZOOM: u8 = 15;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
