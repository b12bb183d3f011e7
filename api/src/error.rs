//! HTTP error mapping.
//!
//! Every error leaves the API as `{"detail": "..."}`. Infrastructure failures
//! are logged and reported as a generic 500 without their message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] shared::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),
}

impl From<fingenius_core::Error> for ApiError {
    fn from(err: fingenius_core::Error) -> Self {
        ApiError::Service(err.into())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        use fingenius_core::Error as Domain;
        use shared::Error as Service;

        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Service(err) => match err {
                Service::Domain(Domain::NotFound { .. }) => StatusCode::NOT_FOUND,
                Service::Domain(Domain::Consistency(_) | Domain::InvalidState(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                Service::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Service::Duplicate(_) | Service::SnapshotConflict(_) => StatusCode::CONFLICT,
                Service::InvalidCredentials => StatusCode::UNAUTHORIZED,
                Service::AccountDisabled => StatusCode::FORBIDDEN,
                Service::Database(_) | Service::Config(_) | Service::PasswordHash(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
