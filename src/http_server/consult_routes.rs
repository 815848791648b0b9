//! Consultation endpoints
//!
//! - `GET /` static welcome
//! - `POST /consult` run one consultation

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::consultation::{ConsultationRequest, ConsultationResult};

use super::errors::HttpError;
use super::state::AppState;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Doctor Droid API. Use POST /consult to evaluate patients.";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

pub fn consult_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/consult", post(consult_handler))
        .with_state(state)
}

async fn welcome_handler() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

async fn consult_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<ConsultationResult>, HttpError> {
    let coordinator = state.coordinator()?;
    let Json(request) = body?;
    Ok(Json(coordinator.consult(request)?))
}
