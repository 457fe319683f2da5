//! Service banner and health probe

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Query endpoints served to the dashboard
pub const QUERY_ENDPOINTS: [&str; 3] = ["/sub-field-detail", "/topic-detail", "/concepts"];

/// Response for `GET /`
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator
    pub status: String,
    /// Available query endpoints
    pub endpoints: Vec<String>,
}

/// Response for `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status indicator
    pub status: String,
    /// Crate version
    pub version: String,
    /// Whether the configured data directory exists
    pub data_dir_available: bool,
}

/// GET / - Service banner
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Research trends query service".to_string(),
        status: "ok".to_string(),
        endpoints: QUERY_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// GET /api/health - Health probe
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let data_dir_available = tokio::fs::metadata(state.store.root())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir_available,
    })
}
