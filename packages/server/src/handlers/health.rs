use axum::{Json, extract::State};

use crate::models::auth::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness and database check",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            "error"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
