//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cabinet_core::ClinicError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned when an update targets an unknown patient.
pub const PATIENT_NOT_FOUND: &str = "Patient non trouvé";

/// Errors surfaced by the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 `{success: false, error}`
    #[error("{0}")]
    BadRequest(String),

    /// 404 `{success: false, message}`
    #[error("{}", PATIENT_NOT_FOUND)]
    PatientNotFound,

    /// 500 `{success: false, error}`
    #[error("{0}")]
    Internal(String),

    /// 500 `{error}`, for the chat and export routes
    #[error("{0}")]
    Bare(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Same failure reported in the bare `{error}` shape.
    pub fn bare(self) -> Self {
        match self {
            ApiError::Bare(_) => self,
            other => ApiError::Bare(other.to_string()),
        }
    }

    /// Storage faults reported as a client error (the add-patient contract).
    pub fn as_bad_request(self) -> Self {
        match self {
            ApiError::Internal(msg) => ApiError::BadRequest(msg),
            other => other,
        }
    }
}

impl From<ClinicError> for ApiError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::NotFound(_) => ApiError::PatientNotFound,
            ClinicError::Storage(_) | ClinicError::RendererUnavailable => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                warn!(error = %msg, "bad request");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "success": false, "error": msg }),
                )
            }
            ApiError::PatientNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": PATIENT_NOT_FOUND }),
            ),
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": msg }),
                )
            }
            ApiError::Bare(msg) => {
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
