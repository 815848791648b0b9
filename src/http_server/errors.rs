//! HTTP error mapping
//!
//! | code                       | status |
//! |----------------------------|--------|
//! | DROID_INVALID_TOKEN        | 400    |
//! | DROID_INVALID_REQUEST      | 400    |
//! | DROID_ENGINE_UNAVAILABLE   | 503    |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::consultation::ConsultError;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Consult(#[from] ConsultError),

    /// Body is not a valid consultation request
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Consult(ConsultError::EngineUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::Consult(_) | HttpError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HttpError::Consult(e) => e.code(),
            HttpError::MalformedBody(_) => "DROID_INVALID_REQUEST",
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::MalformedBody(rejection.body_text())
    }
}

/// `{"status":"error","code":..,"message":..}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl From<&HttpError> for ErrorResponse {
    fn from(err: &HttpError) -> Self {
        Self {
            status: "error",
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{Token, TokenKind};

    #[test]
    fn test_status_codes() {
        let invalid: HttpError = ConsultError::from(
            Token::parse(TokenKind::Symptom, "fever)").unwrap_err(),
        )
        .into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "DROID_INVALID_TOKEN");

        let limit: HttpError = ConsultError::TooManyItems {
            field: "allergies",
            count: 65,
            limit: 64,
        }
        .into();
        assert_eq!(limit.status_code(), StatusCode::BAD_REQUEST);

        let unavailable: HttpError = ConsultError::EngineUnavailable.into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.code(), "DROID_ENGINE_UNAVAILABLE");
    }

    #[test]
    fn test_error_body() {
        let err = HttpError::MalformedBody("missing field `symptoms`".into());
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "DROID_INVALID_REQUEST");
        assert!(body["message"].as_str().unwrap().contains("symptoms"));
    }
}
