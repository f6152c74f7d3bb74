//! Liveness endpoint reporting service and database state.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body returned by `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the service and its database both respond, `degraded`
    /// when the database ping fails.
    pub status: &'static str,
    /// Crate version serving the request.
    pub version: &'static str,
    /// Whether the database connection answered a ping.
    pub database: bool,
}

/// GET /health
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.db.ping().await.is_ok();
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
