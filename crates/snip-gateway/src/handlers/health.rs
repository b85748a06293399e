use crate::model::HealthResponse;
use axum::Json;
use tracing::trace;

/// Liveness only. The store is not consulted.
pub async fn health_handler() -> Json<HealthResponse> {
    trace!("Health check");
    Json(HealthResponse::ok())
}
