//! Health endpoint.
//!
//! `GET /health` always returns 200 OK; the service has nothing upstream
//! that could degrade it.

use axum::Json;
use chrono::Utc;
use tracing::instrument;

use crate::models::HealthResponse;

/// Health check endpoint.
///
/// # Response Body
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
