//! Health, metrics and rule base metadata

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::observability::MetricsSnapshot;
use crate::rules::RuleBaseInfo;

use super::errors::HttpError;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `ready` or `unavailable`
    pub engine: &'static str,
}

pub fn observability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/rules", get(rules_handler))
        .with_state(state)
}

/// Always 200; the `engine` field says whether consultations can be served.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: if state.is_ready() { "ready" } else { "unavailable" },
    })
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics().snapshot())
}

async fn rules_handler(State(state): State<Arc<AppState>>) -> Result<Json<RuleBaseInfo>, HttpError> {
    let coordinator = state.coordinator()?;
    Ok(Json(coordinator.rules().info().clone()))
}
