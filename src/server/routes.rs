//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::constants::region::REGION_NAMES;
use crate::coord::Coordinates;
use crate::error::Error;
use crate::explorer::{ExploreRequest, ResolvedLocation};
use crate::history::HistoryItem;
use crate::provider::{ContentProvider, LocationType};
use crate::server::state::AppState;
use crate::session::{Session, Viewport};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Directory the front end is served from
fn static_dir() -> String {
    if std::path::Path::new("static").exists() {
        return "static".to_string();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|| "static".to_string())
}

/// Create the API router
pub fn create_router<P: ContentProvider + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/api/explore", post(explore_handler::<P>))
        .route("/api/random-point", get(random_point_handler::<P>))
        .route("/api/status", get(status_handler::<P>))
        .route("/api/filters", get(filters_handler))
        .route("/api/session", get(session_handler::<P>))
        .route(
            "/api/history",
            get(history_handler::<P>).delete(history_clear_handler::<P>),
        )
        .route("/api/history/back", post(history_back_handler::<P>))
        .route(
            "/api/history/:id",
            get(history_entry_handler::<P>).delete(history_delete_handler::<P>),
        )
        .route("/api/history/:id/restore", post(history_restore_handler::<P>))
        .nest_service(
            "/",
            ServeDir::new(static_dir()).append_index_html_on_directories(true),
        )
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Message meant for the person using the app
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("Not found: {}", what))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::QuotaExceeded(_) => (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED"),
            Error::CredentialMissing => (StatusCode::SERVICE_UNAVAILABLE, "CREDENTIAL_MISSING"),
            Error::InvalidSeed(_) | Error::InvalidCoordinates(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_SEED")
            }
            Error::Superseded { .. } => (StatusCode::CONFLICT, "SUPERSEDED"),
            e if e.is_dispatch_failure() => (StatusCode::BAD_GATEWAY, "DISPATCH_FAILED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        Self::new(status, code, err.user_message())
    }
}

/// Explore request body
#[derive(Debug, Default, Deserialize)]
pub struct ExploreBody {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Named place to look up
    pub name: Option<String>,
    #[serde(default)]
    pub filters: Vec<String>,
}

/// What the front end should render
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub location: Option<ResolvedLocation>,
    pub view: Viewport,
    pub pin: Option<Coordinates>,
    pub history_index: usize,
    pub can_go_back: bool,
}

async fn session_view<P: ContentProvider>(state: &AppState<P>) -> SessionView {
    let history = state.history.lock().await;
    let session = state.session.lock().await;
    view_of(&session, session.can_go_back(&history))
}

fn view_of(session: &Session, can_go_back: bool) -> SessionView {
    SessionView {
        location: session.location.clone(),
        view: session.viewport,
        pin: session.pin,
        history_index: session.history_index,
        can_go_back,
    }
}

/// Explore endpoint
///
/// POST /api/explore
async fn explore_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Json(body): Json<ExploreBody>,
) -> Result<Json<SessionView>, ApiError> {
    let coords = match (body.lat, body.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
        (None, None) => None,
        _ => {
            return Err(Error::InvalidSeed("lat and lng must be given together".to_string()).into())
        }
    };

    let request = {
        let mut session = state.session.lock().await;

        // A named lookup without coordinates searches around the current pin
        let coords = match (&body.name, coords) {
            (Some(_), None) => session.pin,
            _ => coords,
        };
        let request = ExploreRequest {
            coords,
            target_name: body.name,
            filters: body.filters,
        };

        // Reject bad coordinates before touching the display state
        request.validate()?;
        session.begin(request.kind(), request.coords);
        request
    };
    let kind = request.kind();

    match state.explorer.explore(request).await {
        Ok(location) => {
            let mut history = state.history.lock().await;
            history.add_location(location.clone());
            if let Err(e) = history.save() {
                warn!(error = %e, "Could not save history");
            }

            let mut session = state.session.lock().await;
            session.apply_success(location);
            Ok(Json(view_of(&session, session.can_go_back(&history))))
        }
        // The newer query owns the display state
        Err(e @ Error::Superseded { .. }) => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Explore failed");
            state.session.lock().await.apply_failure(kind);
            Err(e.into())
        }
    }
}

/// Random point endpoint
///
/// GET /api/random-point
async fn random_point_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<Coordinates> {
    Json(state.explorer.sample_seed())
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Content provider name
    pub provider: String,
    pub model: String,
    pub history_count: usize,
    /// Id of the most recently issued query
    pub latest_query: u64,
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<StatusResponse> {
    let history_count = state.history.lock().await.len();

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.explorer.provider().name().to_string(),
        model: state.config.provider.model.clone(),
        history_count,
        latest_query: state.explorer.sequencer().latest(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Available filters
#[derive(Debug, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub regions: Vec<String>,
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub label: String,
}

/// List region and category filters
///
/// GET /api/filters
async fn filters_handler() -> Json<FiltersResponse> {
    Json(FiltersResponse {
        regions: REGION_NAMES.iter().map(|r| r.to_string()).collect(),
        categories: LocationType::ALL
            .iter()
            .map(|t| CategoryInfo {
                name: t.to_string(),
                label: t.label().to_string(),
            })
            .collect(),
    })
}

/// Current display state
///
/// GET /api/session
async fn session_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<SessionView> {
    Json(session_view(&state).await)
}

/// History list response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryItem>,
    pub count: usize,
}

/// Get history list
///
/// GET /api/history
async fn history_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<HistoryResponse> {
    let history = state.history.lock().await;
    Json(HistoryResponse {
        entries: history.entries().to_vec(),
        count: history.len(),
    })
}

/// Clear history and reset the display
///
/// DELETE /api/history
async fn history_clear_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<StatusCode, ApiError> {
    let mut history = state.history.lock().await;
    history.clear();
    history.save()?;
    state.session.lock().await.reset();

    info!("History cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Get a single history entry
///
/// GET /api/history/:id
async fn history_entry_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryItem>, ApiError> {
    let history = state.history.lock().await;
    history
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&format!("history entry {}", id)))
}

/// Delete a history entry
///
/// DELETE /api/history/:id
async fn history_delete_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut history = state.history.lock().await;

    if history.remove(&id).is_none() {
        return Err(ApiError::not_found(&format!("history entry {}", id)));
    }
    history.save()?;

    // Keep the index pointing inside the list
    let mut session = state.session.lock().await;
    session.history_index = session.history_index.min(history.len().saturating_sub(1));

    Ok(StatusCode::NO_CONTENT)
}

/// Show a history entry
///
/// POST /api/history/:id/restore
async fn history_restore_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let history = state.history.lock().await;
    let mut session = state.session.lock().await;

    if !session.restore_from(&history, &id) {
        return Err(ApiError::not_found(&format!("history entry {}", id)));
    }
    Ok(Json(view_of(&session, session.can_go_back(&history))))
}

/// Step back to the next older history entry
///
/// POST /api/history/back
async fn history_back_handler<P: ContentProvider + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<SessionView>, ApiError> {
    let history = state.history.lock().await;
    let mut session = state.session.lock().await;

    if !session.back(&history) {
        return Err(ApiError::not_found("older history entry"));
    }
    Ok(Json(view_of(&session, session.can_go_back(&history))))
}
