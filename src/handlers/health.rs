//! # Health Check Handler
//!
//! Used by load balancers and monitoring systems.

use crate::error::AppResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Health check endpoint
///
/// ## Route
/// GET /health
///
/// ## Response
/// ```json
/// { "status": "healthy", "database": "ok" }
/// ```
///
/// Pings the store first, so an unreachable database surfaces as a 500.
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    sqlx::query("SELECT 1").execute(&state.db).await?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "ok"
    })))
}
