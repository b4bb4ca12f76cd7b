use actix_web::{get, web};
use chrono::Utc;

use crate::types::HealthResponse;

/// Liveness only; no dependency checks.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "account"
)]
#[get("/api/health")]
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}
