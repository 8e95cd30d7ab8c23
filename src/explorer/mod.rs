//! Location queries
//!
//! `Explorer` runs one query end to end:
//! - seeding: caller coordinates, or a point sampled inside Latvia
//! - dispatch: one call to the content provider
//! - reconcile: validate the answer against the seed (see `reconcile`)
//!
//! Each query takes a ticket from the `QuerySequencer`; a query that is
//! overtaken by a newer one fails with `Error::Superseded` instead of
//! returning stale content.

pub mod reconcile;
pub mod sequence;

use crate::config::Config;
use crate::constants::region::NEARBY_SANITY_BOUNDS;
use crate::coord::sampler::sample_random_point;
use crate::coord::{BoundingBox, Coordinates};
use crate::error::{Error, Result};
use crate::provider::{ContentProvider, ContentRequest, Fact, LocationType, Region, Source};
use crate::rng::{pseudo::ThreadSource, RandomSource};
use reconcile::{reconcile, ReconcileOptions};
use sequence::QuerySequencer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A nearby place with a locally computed distance label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    /// Distance from the resolved location, e.g. "640 m" or "2.4 km"
    pub distance: String,
    pub coordinates: Coordinates,
}

/// The validated result of one query
///
/// Built fresh per query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub id: String,
    /// RFC 3339
    pub timestamp: String,
    /// The point the provider was asked about
    pub seed_coordinate: Coordinates,
    /// Where the place actually is
    pub final_coordinate: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    pub title: String,
    pub description: String,
    pub facts: Vec<Fact>,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default)]
    pub region: Option<Region>,
    /// Sorted by ascending distance
    pub nearby_places: Vec<NearbyPlace>,
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// How a query was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// "Take me somewhere": the seed is sampled
    Random,
    /// A named place or explicit coordinates
    Targeted,
}

/// What the caller wants explored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploreRequest {
    /// Explicit seed; sampled when absent
    pub coords: Option<Coordinates>,
    pub target_name: Option<String>,
    pub filters: Vec<String>,
}

impl ExploreRequest {
    /// A random query
    pub fn random() -> Self {
        Self::default()
    }

    /// A query for a named place, optionally near a hint coordinate
    pub fn named(name: impl Into<String>, hint: Option<Coordinates>) -> Self {
        Self {
            coords: hint,
            target_name: Some(name.into()),
            filters: Vec::new(),
        }
    }

    /// A query around explicit coordinates
    pub fn at(coords: Coordinates) -> Self {
        Self {
            coords: Some(coords),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    /// Check caller-supplied coordinates
    ///
    /// They must be finite and in range, otherwise the query is aborted with
    /// `InvalidSeed` before anything is dispatched.
    pub fn validate(&self) -> Result<()> {
        match self.coords {
            Some(coords) => coords
                .validate()
                .map_err(|e| Error::InvalidSeed(e.to_string())),
            None => Ok(()),
        }
    }

    pub fn kind(&self) -> QueryKind {
        if self.coords.is_some() || self.target_name.is_some() {
            QueryKind::Targeted
        } else {
            QueryKind::Random
        }
    }
}

/// Tunables for the explorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExploreSettings {
    pub max_attempts: usize,
    /// Nearby places kept for random queries
    pub nearby_limit: usize,
    /// Nearby places kept when a target name was given
    pub targeted_nearby_limit: usize,
    pub sanity_bounds: BoundingBox,
}

impl Default for ExploreSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ExploreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.explore.max_attempts.max(1),
            nearby_limit: config.explore.nearby_limit,
            targeted_nearby_limit: config.explore.targeted_nearby_limit,
            sanity_bounds: NEARBY_SANITY_BOUNDS,
        }
    }

    fn reconcile_options(&self, request: &ExploreRequest) -> ReconcileOptions {
        let nearby_limit = if request.target_name.is_some() {
            self.targeted_nearby_limit
        } else {
            self.nearby_limit
        };

        ReconcileOptions {
            nearby_limit,
            sanity_bounds: self.sanity_bounds,
        }
    }
}

/// Runs location queries against a content provider
pub struct Explorer<P: ContentProvider> {
    provider: P,
    rng: Box<dyn RandomSource>,
    settings: ExploreSettings,
    sequencer: QuerySequencer,
}

impl<P: ContentProvider> Explorer<P> {
    pub fn new(provider: P, settings: ExploreSettings) -> Self {
        Self::with_rng(provider, settings, Box::new(ThreadSource::new()))
    }

    /// Create an explorer drawing seeds from `rng`
    pub fn with_rng(provider: P, settings: ExploreSettings, rng: Box<dyn RandomSource>) -> Self {
        Self {
            provider,
            rng,
            settings,
            sequencer: QuerySequencer::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &ExploreSettings {
        &self.settings
    }

    pub fn sequencer(&self) -> &QuerySequencer {
        &self.sequencer
    }

    /// A fresh random point inside Latvia
    pub fn sample_seed(&self) -> Coordinates {
        sample_random_point(self.settings.max_attempts, self.rng.as_ref())
    }

    /// Determine the seed coordinate for a request
    ///
    /// Caller coordinates win; otherwise a point is sampled.
    pub fn seed(&self, request: &ExploreRequest) -> Result<Coordinates> {
        request.validate()?;
        Ok(request.coords.unwrap_or_else(|| self.sample_seed()))
    }

    /// Run one query
    ///
    /// Returns a complete `ResolvedLocation` or an error; never anything in
    /// between. Fails with `Superseded` if another query was started before
    /// this one finished.
    pub async fn explore(&self, request: ExploreRequest) -> Result<ResolvedLocation> {
        let seed = self.seed(&request)?;
        let options = self.settings.reconcile_options(&request);

        let mut ticket = self.sequencer.issue();
        let ticket_id = ticket.id();

        let content = ContentRequest {
            seed,
            target_name: request.target_name.clone(),
            filters: request.filters.clone(),
        };

        debug!(
            ticket = ticket_id,
            provider = self.provider.name(),
            kind = ?request.kind(),
            lat = seed.lat,
            lng = seed.lng,
            "Dispatching query"
        );

        // A newer ticket wins even when the provider settles in the same poll
        let outcome = tokio::select! {
            biased;
            _ = ticket.superseded() => {
                debug!(ticket = ticket_id, "Query superseded while waiting for provider");
                return Err(Error::Superseded { ticket: ticket_id });
            }
            result = self.provider.fetch(&content) => result,
        };

        // Stale outcomes are dropped whole, failures included
        if !self.sequencer.is_latest(&ticket) {
            debug!(ticket = ticket_id, "Dropping stale outcome");
            return Err(Error::Superseded { ticket: ticket_id });
        }

        let resolved = reconcile(seed, request.target_name, outcome?, &options);

        info!(
            ticket = ticket_id,
            title = %resolved.title,
            lat = resolved.final_coordinate.lat,
            lng = resolved.final_coordinate.lng,
            "Resolved location"
        );

        Ok(resolved)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::coord::region::is_in_latvia;
    use crate::coord::validate::RawCoordinates;
    use crate::provider::{LocationPayload, ProviderResponse, RawNearbyPlace};
    use crate::rng::pseudo::SeededSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Target name that makes `FakeProvider` wait forever
    pub const STALL: &str = "gaidīt";

    /// Deterministic provider for tests
    pub struct FakeProvider {
        pub exact: Option<RawCoordinates>,
        pub failure: Option<fn() -> Error>,
        pub calls: AtomicUsize,
        pub last_request: Mutex<Option<ContentRequest>>,
    }

    impl FakeProvider {
        pub fn answering(exact: Option<RawCoordinates>) -> Self {
            Self {
                exact,
                failure: None,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        pub fn failing(failure: fn() -> Error) -> Self {
            Self {
                failure: Some(failure),
                ..Self::answering(None)
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn sample_response(exact: Option<RawCoordinates>) -> ProviderResponse {
        ProviderResponse {
            payload: LocationPayload {
                title: "Gaujas senleja".to_string(),
                description: "Senleja ar smilšakmens atsegumiem.".to_string(),
                facts: vec![Fact {
                    text: "Garākā upe, kas plūst tikai Latvijā.".to_string(),
                    source_url: None,
                }],
                location_type: LocationType::River,
                region: Some(Region::Vidzeme),
                exact_coordinates: exact,
                nearby_places: vec![
                    RawNearbyPlace {
                        name: "Tālais".to_string(),
                        place_type: "Castle".to_string(),
                        distance: None,
                        coordinates: Some(RawCoordinates::new(56.018, 25.0)),
                    },
                    RawNearbyPlace {
                        name: "Tuvais".to_string(),
                        place_type: "Nature".to_string(),
                        distance: Some("10 km".to_string()),
                        coordinates: Some(RawCoordinates::new(56.004497, 25.0)),
                    },
                ],
                website: None,
                is_official_website: None,
            },
            sources: Vec::new(),
        }
    }

    impl ContentProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn fetch(&self, request: &ContentRequest) -> Result<ProviderResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_request.lock() {
                *last = Some(request.clone());
            }

            if request.target_name.as_deref() == Some(STALL) {
                std::future::pending::<()>().await;
            }
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            Ok(sample_response(self.exact))
        }
    }

    /// Answers named lookups at once; random queries wait for `gate`, then fail
    #[derive(Default)]
    pub struct GatedProvider {
        pub gate: tokio::sync::Notify,
    }

    impl ContentProvider for GatedProvider {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn fetch(&self, request: &ContentRequest) -> Result<ProviderResponse> {
            if request.target_name.is_some() {
                return Ok(sample_response(Some(RawCoordinates::new(56.0, 25.0))));
            }
            self.gate.notified().await;
            Err(Error::Dispatch("gateway timeout".to_string()))
        }
    }

    fn explorer_with<P: ContentProvider>(provider: P) -> Explorer<P> {
        Explorer::with_rng(
            provider,
            ExploreSettings::default(),
            Box::new(SeededSource::new(7)),
        )
    }

    fn explorer(provider: FakeProvider) -> Explorer<FakeProvider> {
        explorer_with(provider)
    }

    #[test]
    fn test_request_kind() {
        assert_eq!(ExploreRequest::random().kind(), QueryKind::Random);
        assert_eq!(ExploreRequest::named("Cēsis", None).kind(), QueryKind::Targeted);
        assert_eq!(
            ExploreRequest::at(Coordinates::new(56.9, 24.1)).kind(),
            QueryKind::Targeted
        );
    }

    #[test]
    fn test_random_seed_is_in_latvia() {
        let explorer = explorer(FakeProvider::answering(None));
        for _ in 0..20 {
            let seed = explorer.seed(&ExploreRequest::random()).unwrap();
            assert!(is_in_latvia(seed));
        }
    }

    #[test]
    fn test_invalid_caller_seed_rejected() {
        let explorer = explorer(FakeProvider::answering(None));

        let nan = ExploreRequest::at(Coordinates::new(f64::NAN, 24.0));
        assert!(matches!(explorer.seed(&nan), Err(Error::InvalidSeed(_))));

        let out_of_range = ExploreRequest::at(Coordinates::new(95.0, 24.0));
        assert!(matches!(explorer.seed(&out_of_range), Err(Error::InvalidSeed(_))));
    }

    #[tokio::test]
    async fn test_invalid_seed_never_dispatches() {
        let explorer = explorer(FakeProvider::answering(None));
        let result = explorer
            .explore(ExploreRequest::at(Coordinates::new(24.0, f64::INFINITY)))
            .await;

        assert!(matches!(result, Err(Error::InvalidSeed(_))));
        assert_eq!(explorer.provider().calls(), 0);
    }

    #[tokio::test]
    async fn test_explore_prefers_exact_coordinate() {
        let explorer = explorer(FakeProvider::answering(Some(RawCoordinates::new(56.0, 25.0))));
        let seed = Coordinates::new(56.5, 25.5);

        let resolved = explorer.explore(ExploreRequest::at(seed)).await.unwrap();

        assert_eq!(resolved.seed_coordinate, seed);
        assert_eq!(resolved.final_coordinate, Coordinates::new(56.0, 25.0));
        assert_eq!(resolved.nearby_places[0].name, "Tuvais");
        assert_eq!(resolved.nearby_places[0].distance, "500 m");
        assert_eq!(resolved.nearby_places[1].distance, "2.0 km");
    }

    #[tokio::test]
    async fn test_explore_falls_back_to_seed() {
        let explorer = explorer(FakeProvider::answering(Some(RawCoordinates::new(0.0, 0.0))));
        let seed = Coordinates::new(56.5, 25.5);

        let resolved = explorer.explore(ExploreRequest::at(seed)).await.unwrap();
        assert_eq!(resolved.final_coordinate, seed);
    }

    #[tokio::test]
    async fn test_request_forwarded_to_provider() {
        let explorer = explorer(FakeProvider::answering(None));
        let request = ExploreRequest::named("Ventas rumba", Some(Coordinates::new(56.97, 21.98)))
            .with_filters(vec!["Kurzeme".to_string()]);

        explorer.explore(request).await.unwrap();

        let sent = explorer.provider().last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.seed, Coordinates::new(56.97, 21.98));
        assert_eq!(sent.target_name.as_deref(), Some("Ventas rumba"));
        assert_eq!(sent.filters, vec!["Kurzeme".to_string()]);
    }

    #[tokio::test]
    async fn test_targeted_query_uses_smaller_nearby_limit() {
        let mut settings = ExploreSettings::default();
        settings.targeted_nearby_limit = 1;
        let explorer = Explorer::with_rng(
            FakeProvider::answering(Some(RawCoordinates::new(56.0, 25.0))),
            settings,
            Box::new(SeededSource::new(1)),
        );

        let targeted = explorer
            .explore(ExploreRequest::named("Tuvais", None))
            .await
            .unwrap();
        assert_eq!(targeted.nearby_places.len(), 1);

        let random = explorer.explore(ExploreRequest::random()).await.unwrap();
        assert_eq!(random.nearby_places.len(), 2);
    }

    #[tokio::test]
    async fn test_quota_failure_is_distinguished() {
        let explorer = explorer(FakeProvider::failing(|| {
            Error::QuotaExceeded("RESOURCE_EXHAUSTED".to_string())
        }));

        let err = explorer.explore(ExploreRequest::random()).await.unwrap_err();
        assert!(err.is_quota());
        assert!(err.is_dispatch_failure());
    }

    #[tokio::test]
    async fn test_generic_failure_is_not_quota() {
        let explorer = explorer(FakeProvider::failing(|| {
            Error::Dispatch("connection reset".to_string())
        }));

        let err = explorer.explore(ExploreRequest::random()).await.unwrap_err();
        assert!(!err.is_quota());
        assert!(err.is_dispatch_failure());
    }

    #[tokio::test]
    async fn test_missing_credential_surfaces() {
        let explorer = explorer(FakeProvider::failing(|| Error::CredentialMissing));
        let err = explorer.explore(ExploreRequest::random()).await.unwrap_err();
        assert!(matches!(err, Error::CredentialMissing));
    }

    #[tokio::test]
    async fn test_newer_query_supersedes_pending_one() {
        let explorer = explorer(FakeProvider::answering(Some(RawCoordinates::new(56.0, 25.0))));

        let slow = explorer.explore(ExploreRequest::named(STALL, None));
        let fast = async {
            while explorer.sequencer().latest() < 1 {
                tokio::task::yield_now().await;
            }
            explorer.explore(ExploreRequest::random()).await
        };

        let (slow, fast) = tokio::join!(slow, fast);

        assert!(matches!(slow, Err(Error::Superseded { ticket: 1 })));
        assert_eq!(fast.unwrap().final_coordinate, Coordinates::new(56.0, 25.0));
    }

    #[tokio::test]
    async fn test_failure_after_newer_query_is_superseded() {
        // Both outcomes are ready on the same poll; repeat over fresh explorers
        for _ in 0..50 {
            let explorer = explorer_with(GatedProvider::default());

            let stale = explorer.explore(ExploreRequest::random());
            let newer = async {
                while explorer.sequencer().latest() < 1 {
                    tokio::task::yield_now().await;
                }
                let _newer = explorer.sequencer().issue();
                explorer.provider().gate.notify_one();
            };

            let (stale, ()) = tokio::join!(stale, newer);
            assert!(matches!(stale, Err(Error::Superseded { ticket: 1 })));
        }
    }

    #[tokio::test]
    async fn test_failure_of_latest_query_surfaces() {
        let explorer = explorer_with(GatedProvider::default());
        explorer.provider().gate.notify_one();

        let err = explorer.explore(ExploreRequest::random()).await.unwrap_err();
        assert!(matches!(err, Error::Dispatch(_)));
    }
}
