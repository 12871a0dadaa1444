//! Liveness probe.

use axum::Json;
use serde::Serialize;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// GET /health -- always `{ok: true}` while the process is serving.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
