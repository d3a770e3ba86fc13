/// Health check endpoint
///
/// Used by monitoring, load balancers, and container orchestration. Verifies
/// liveness and database connectivity.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health`
///
/// Returns 200 with service status, or 503 when the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|_| ApiError::ServiceUnavailable("Database unavailable".to_string()))?;

    Ok(Json(json!({
        "status": "ok",
        "service": "taskshare-api",
        "database": "up"
    })))
}
