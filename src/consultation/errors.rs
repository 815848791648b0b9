//! Consultation errors
//!
//! Error codes:
//! - DROID_INVALID_TOKEN: symptom or allergy outside the token grammar
//! - DROID_INVALID_REQUEST: request exceeds the per-consultation limits
//! - DROID_ENGINE_UNAVAILABLE: no rule base loaded
//!
//! All three are rejected before any fact is asserted.

use thiserror::Error;

use crate::facts::FactError;

#[derive(Debug, Error)]
pub enum ConsultError {
    #[error(transparent)]
    InvalidToken(#[from] FactError),

    #[error("too many {field}: {count} given, at most {limit} allowed")]
    TooManyItems {
        field: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("inference engine is not initialized")]
    EngineUnavailable,
}

impl ConsultError {
    pub fn code(&self) -> &'static str {
        match self {
            ConsultError::InvalidToken(e) => e.code(),
            ConsultError::TooManyItems { .. } => "DROID_INVALID_REQUEST",
            ConsultError::EngineUnavailable => "DROID_ENGINE_UNAVAILABLE",
        }
    }

    /// Caller errors; the engine itself is fine
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ConsultError::EngineUnavailable)
    }

    pub fn is_fatal(&self) -> bool {
        false
    }
}

pub type ConsultResult<T> = Result<T, ConsultError>;
