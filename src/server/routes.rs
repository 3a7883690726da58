//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::config::FormsConfig;
use crate::coord::Coordinates;
use crate::error::Error;
use crate::geo::{available_backends, AddressSource, BackendInfo, GeoBackend, SearchResult};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/map", get(map_handler))
        .route("/api/forms", get(forms_handler))
        .route("/api/search", get(search_handler))
        .route("/api/reverse", get(reverse_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "GEOCODING_UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::GeocodingUnavailable(_) => "GEOCODING_UNAVAILABLE",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Active geocoding backend
    pub geocoder: String,
    /// Geocoding backends this build supports
    pub geocoders: Vec<BackendInfo>,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.geocoder().backend().name().to_string(),
        geocoders: available_backends(),
    })
}

/// Map picker settings response
#[derive(Debug, Serialize, Deserialize)]
pub struct MapResponse {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_url: String,
}

/// Map picker defaults
///
/// GET /api/map
async fn map_handler(State(state): State<Arc<AppState>>) -> Json<MapResponse> {
    let config = state.config();
    Json(MapResponse {
        center: config.map.center(),
        zoom: config.map.zoom,
        tile_url: config.map.tile_url.clone(),
    })
}

/// Form validation policy
///
/// GET /api/forms
async fn forms_handler(State(state): State<Arc<AppState>>) -> Json<FormsConfig> {
    Json(state.config().forms)
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Forward geocoding
///
/// GET /api/search?q=...
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .geocoder()
        .forward_search(&params.q)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(SearchResponse {
        query: params.q,
        results,
    }))
}

/// Reverse query parameters
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReverseResponse {
    pub coordinates: Coordinates,
    pub address: String,
    pub source: AddressSource,
}

/// Reverse geocoding; falls back to the formatted coordinate
///
/// GET /api/reverse?lat=...&lng=...
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<ReverseResponse>, ApiError> {
    let coordinates = Coordinates::new(params.lat, params.lng);
    coordinates.validate().map_err(ApiError::from)?;

    let resolved = state.geocoder().reverse_lookup(coordinates).await;

    Ok(Json(ReverseResponse {
        coordinates,
        address: resolved.address,
        source: resolved.source,
    }))
}
