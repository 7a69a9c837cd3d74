use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::applications::ApplicationError;
use crate::application::use_cases::auth::AuthError;
use crate::application::use_cases::contractors::ContractorError;
use crate::application::use_cases::customers::CustomerError;
use crate::application::use_cases::lines::LineError;
use crate::application::use_cases::tags::TagError;
use crate::application::use_cases::uploads::sign_upload::UploadError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Failure of an HTTP handler, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Logs the cause and hides it from the client.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::BadRequest(_) => {
                ApiError::bad_request(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::Unauthorized => {
                ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::BadRequest(msg) => ApiError::bad_request(msg),
            ApplicationError::NotFound => ApiError::not_found(err.to_string()),
            ApplicationError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<LineError> for ApiError {
    fn from(err: LineError) -> Self {
        match err {
            LineError::BadRequest(msg) => ApiError::bad_request(msg),
            LineError::NotFound(_) => ApiError::not_found(err.to_string()),
            LineError::Forbidden => ApiError::new(StatusCode::FORBIDDEN, err.to_string()),
            LineError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<TagError> for ApiError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::BadRequest(_) | TagError::NameTaken | TagError::InUse(_) => {
                ApiError::bad_request(err.to_string())
            }
            TagError::NotFound => ApiError::not_found(err.to_string()),
            TagError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<ContractorError> for ApiError {
    fn from(err: ContractorError) -> Self {
        match err {
            ContractorError::BadRequest(msg) => ApiError::bad_request(msg),
            ContractorError::NotFound(msg) => ApiError::not_found(msg),
            ContractorError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::BadRequest(msg) => ApiError::bad_request(msg),
            CustomerError::NotFound(msg) => ApiError::not_found(msg),
            CustomerError::Unauthorized => ApiError::unauthorized(),
            CustomerError::Internal(e) => ApiError::internal(e),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidKey(e) => ApiError::bad_request(e.to_string()),
            UploadError::Internal(e) => ApiError::internal(e),
        }
    }
}
