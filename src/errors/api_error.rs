//! Translation of internal errors into HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::service::ServiceError;
use crate::registry::RegistryError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Request-scoped error. Boot-time failures never reach this type; they abort
/// startup in `main` instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(format!("invalid multipart request: {err}"))
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Registry(err) => match err {
                RegistryError::ServiceNotFound(_) | RegistryError::ServiceNotReady { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                RegistryError::DuplicateServiceName(_) | RegistryError::ServiceTypeMismatch(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Service(err) => match err {
                ServiceError::Upstream { .. } | ServiceError::Http(_) => StatusCode::BAD_GATEWAY,
                ServiceError::MissingCredentials(_) | ServiceError::InvalidConfiguration(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!(%status, %detail, "request failed");
        } else {
            warn!(%status, %detail, "request rejected");
        }

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
