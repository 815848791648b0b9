//! # Doctor Droid HTTP Server
//!
//! Thin glue over [`ConsultationCoordinator`](crate::consultation::ConsultationCoordinator).
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `POST /consult` - Diagnose one patient
//! - `GET /health` - Liveness and engine readiness
//! - `GET /metrics` - Consultation counters
//! - `GET /rules` - Loaded rule base metadata

pub mod config;
pub mod consult_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;
mod state;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, HttpError};
pub use server::HttpServer;
pub use state::AppState;
