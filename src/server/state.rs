//! Server shared state
//!
//! Holds configuration, the explorer and the per-server session and history.

use crate::config::Config;
use crate::error::Result;
use crate::explorer::{ExploreSettings, Explorer};
use crate::history::History;
use crate::provider::gemini::GeminiProvider;
use crate::provider::ContentProvider;
use crate::session::Session;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::warn;

/// Shared state for the HTTP server
pub struct AppState<P: ContentProvider> {
    /// Configuration
    pub config: Config,

    /// Runs queries; also owns the query sequencer
    pub explorer: Explorer<P>,

    /// Visited places
    pub history: Mutex<History>,

    /// What the front end should currently show
    pub session: Mutex<Session>,

    started: Instant,
}

impl AppState<GeminiProvider> {
    /// State backed by the Gemini provider and the on-disk history
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = GeminiProvider::from_config(&config)?;
        if !provider.has_credential() {
            warn!("No Gemini API key configured; explore requests will fail");
        }
        let history = History::load()?;
        Ok(Self::new(config, provider, history))
    }
}

impl<P: ContentProvider> AppState<P> {
    /// Create new application state
    pub fn new(config: Config, provider: P, history: History) -> Self {
        let explorer = Explorer::new(provider, ExploreSettings::from_config(&config));
        Self::with_explorer(config, explorer, history)
    }

    /// Create state around an existing explorer
    pub fn with_explorer(config: Config, explorer: Explorer<P>, history: History) -> Self {
        Self {
            config,
            explorer,
            history: Mutex::new(history),
            session: Mutex::new(Session::new()),
            started: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
