//! Routes for the tariff widget
//!
//! GET    /                             - embedded single-page widget
//! GET    /api/health                   - liveness
//! GET    /api/countries                - dropdown entries with flags
//! GET    /api/tiers                    - tier ranges and candidate assets
//! POST   /api/session                  - create a session (evicts idle ones)
//! GET    /api/session/:id              - current session view
//! DELETE /api/session/:id              - drop a session
//! PUT    /api/session/:id/selection    - select a country (clears result)
//! DELETE /api/session/:id/selection    - clear selection (clears result)
//! POST   /api/session/:id/generate     - generate; no-op without selection
//! POST   /api/session/:id/reset        - clear result

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::session::AppState;
use crate::countries::{Country, COUNTRIES};
use crate::generator::TariffResult;
use crate::session::{SessionState, TariffSession};
use crate::tier::Tier;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryView {
    pub name: String,
    pub code: String,
    pub flag: String,
}

impl From<&Country> for CountryView {
    fn from(country: &Country) -> Self {
        Self {
            name: country.name.to_string(),
            code: country.code.to_string(),
            flag: country.flag(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TierView {
    pub tier: Tier,
    pub min: u32,
    pub max: u32,
    pub assets: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub selection: Option<CountryView>,
    pub result: Option<TariffResult>,
    /// False while nothing is selected; drives the disabled Generate button
    pub can_generate: bool,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn from_session(session: &TariffSession) -> Self {
        Self {
            session_id: session.id,
            selection: session.selection().map(|s| CountryView::from(s.country())),
            result: session.result().cloned(),
            can_generate: session.can_generate(),
            state: session.state(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectRequest {
    /// Country name or alpha-2 code
    pub country: String,
}

/// Build the router with all routes and middleware.
///
/// `static_dir`, when given, is served under `/static`.
pub fn build_router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/countries", get(list_countries))
        .route("/api/tiers", get(list_tiers))
        .route("/api/session", post(create_session))
        .route("/api/session/:id", get(get_session).delete(delete_session))
        .route(
            "/api/session/:id/selection",
            put(select_country).delete(clear_selection),
        )
        .route("/api/session/:id/generate", post(generate))
        .route("/api/session/:id/reset", post(reset));

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse {
        success: true,
        data: Some("OK".to_string()),
        error: None,
    })
}

async fn list_countries() -> Json<Vec<CountryView>> {
    Json(COUNTRIES.iter().map(CountryView::from).collect())
}

async fn list_tiers(State(state): State<AppState>) -> Json<Vec<TierView>> {
    let config = state.factory.config();
    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| {
            let range = tier.range(config);
            TierView {
                tier,
                min: *range.start(),
                max: *range.end(),
                assets: config.assets.candidates(tier).to_vec(),
            }
        })
        .collect();
    Json(tiers)
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid session id '{}'", raw)))
}

/// Run `f` against the session with the given id under the write lock
async fn with_session<F>(state: &AppState, raw_id: &str, f: F) -> Result<SessionView, ApiError>
where
    F: FnOnce(&mut TariffSession) -> Result<(), ApiError>,
{
    let id = parse_session_id(raw_id)?;
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Session '{}' not found", id)))?;
    f(session)?;
    Ok(SessionView::from_session(session))
}

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let session = state.factory.create()?;
    let view = SessionView::from_session(&session);
    info!(session_id = %session.id, "Session created");

    state.insert_session(session).await;
    Ok(Json(view))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |_| Ok(())).await.map(Json)
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    match state.sessions.write().await.remove(&id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::NotFound(format!("Session '{}' not found", id))),
    }
}

async fn select_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |session| {
        session.select(&req.country)?;
        Ok(())
    })
    .await
    .map(Json)
}

async fn clear_selection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |session| {
        session.clear_selection();
        Ok(())
    })
    .await
    .map(Json)
}

/// Always 200: without a selection the view comes back unchanged.
async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |session| {
        session.generate();
        Ok(())
    })
    .await
    .map(Json)
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |session| {
        session.reset();
        Ok(())
    })
    .await
    .map(Json)
}
