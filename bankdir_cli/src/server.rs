//! JSON HTTP API over a [`Directory`].
//!
//! Every route is a GET returning `{"success": .., "data": .., "error": ..}`.
//! Optional parameters that fail sanitization are ignored; missing required
//! parameters are a 400.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use bankdir_lib::validation::{
    institution_key, sanitize_publication, sanitize_season, sanitize_state, sanitize_year,
    search_query_from_pairs,
};
use bankdir_lib::{
    Directory, DirectoryError, FiguresReport, HistoryEntry, InstitutionDetail, MembershipRoster,
    PublicationChoice, SearchResults,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Shared application state. SQLite connections are not `Sync`, so requests
/// take turns on the one directory.
#[derive(Clone)]
struct AppState {
    directory: Arc<Mutex<Directory>>,
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

enum ApiError {
    Directory(DirectoryError),
    LockPoisoned,
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        ApiError::Directory(e)
    }
}

fn missing_parameters(what: &str) -> ApiError {
    ApiError::Directory(DirectoryError::InvalidInput(what.to_string()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Directory(DirectoryError::NotFound(what)) => {
                tracing::debug!(%what, "not found");
                (StatusCode::NOT_FOUND, "Not found")
            }
            ApiError::Directory(DirectoryError::InvalidInput(msg)) => {
                tracing::debug!(%msg, "rejected request");
                (StatusCode::BAD_REQUEST, "Missing parameters")
            }
            ApiError::Directory(e) => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
            ApiError::LockPoisoned => {
                tracing::error!("directory lock poisoned");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

impl AppState {
    fn with_directory<T>(
        &self,
        f: impl FnOnce(&Directory) -> std::result::Result<T, DirectoryError>,
    ) -> ApiResult<T> {
        let directory = self.directory.lock().map_err(|_| ApiError::LockPoisoned)?;
        let data = f(&directory)?;
        Ok(Json(ApiResponse::ok(data)))
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/search?state[]=KS&type[]=bank&county[]=..&membership[]=..&assets[]=..&q=..
async fn search(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<SearchResults> {
    let raw = raw.unwrap_or_default();
    let query = search_query_from_pairs(url::form_urlencoded::parse(raw.as_bytes()));
    state.with_directory(|d| d.search(&query))
}

/// GET /api/figures?state=KS&id=00001&year=2019&season=fall
async fn figures(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<FiguresReport> {
    let key = institution_key(param(&params, "state"), param(&params, "id"));
    let publication = sanitize_publication(param(&params, "year"), param(&params, "season"));
    let (Some(key), Some(publication)) = (key, publication) else {
        return Err(missing_parameters("state, id, year and season are required"));
    };
    state.with_directory(|d| d.figures_for_publication(&key, publication))
}

/// GET /api/financial-history?state=KS&id=00001
async fn financial_history(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<HistoryEntry>> {
    let Some(key) = institution_key(param(&params, "state"), param(&params, "id")) else {
        return Err(missing_parameters("state and id are required"));
    };
    state.with_directory(|d| d.financial_history(&key))
}

/// GET /api/institutions/:state/:id?fig_year=2019&fig_season=spring
async fn institution(
    State(state): State<AppState>,
    Path((pub_state, bank_no)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<InstitutionDetail> {
    let Some(key) = institution_key(Some(&pub_state), Some(&bank_no)) else {
        return Err(missing_parameters("state and id are required"));
    };
    let figures = sanitize_publication(param(&params, "fig_year"), param(&params, "fig_season"));
    state.with_directory(|d| d.institution_detail(&key, figures))
}

/// GET /api/memberships/:code?state=KS&year=2020&season=fall
async fn membership(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<MembershipRoster> {
    let pub_state = param(&params, "state").and_then(sanitize_state);
    let year = param(&params, "year").and_then(sanitize_year);
    let season = param(&params, "season").and_then(sanitize_season);
    state.with_directory(|d| d.membership_roster(&code, pub_state.as_deref(), year, season))
}

/// GET /api/publications?state=KS&year=2020
async fn publications(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<PublicationChoice> {
    let pub_state = param(&params, "state").and_then(sanitize_state);
    let year = param(&params, "year").and_then(sanitize_year);
    state.with_directory(|d| d.publications(pub_state.as_deref(), year))
}

pub fn router(directory: Directory) -> Router {
    let state = AppState {
        directory: Arc::new(Mutex::new(directory)),
    };

    let api = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/figures", get(figures))
        .route("/financial-history", get(financial_history))
        .route("/institutions/:state/:id", get(institution))
        .route("/memberships/:code", get(membership))
        .route("/publications", get(publications));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(directory: Directory, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    tracing::info!(addr = %listener.local_addr()?, "serving directory API");
    axum::serve(listener, router(directory)).await?;
    Ok(())
}
