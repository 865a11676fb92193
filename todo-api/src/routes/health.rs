/// Liveness check
///
/// `GET /health` answers `200` with the JSON string `"Healthy"` without
/// touching the database.
use axum::Json;

pub async fn health_check() -> Json<&'static str> {
    Json("Healthy")
}
