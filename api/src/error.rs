//! API error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reporta_forms::{FormError, UploadError, ValidationError};
use reporta_store::StoreError;
use reporta_workflow::WorkflowError;
use thiserror::Error;

use crate::models::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("storage error: {0}")]
    Persistence(#[from] StoreError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(e) => ApiError::Validation(e),
            FormError::Upload(e) => ApiError::Upload(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Workflow(WorkflowError::UnknownStatus(_) | WorkflowError::UnknownFlavor(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Workflow(_) => StatusCode::CONFLICT,
            ApiError::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(UploadError::Storage(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Upload(UploadError::NotUploadField(_)) => StatusCode::BAD_REQUEST,
            ApiError::Upload(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Persistence(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code(),
            ApiError::Workflow(WorkflowError::Terminal(_)) => "terminal_status",
            ApiError::Workflow(WorkflowError::NotInFlavor { .. }) => "status_not_in_workflow",
            ApiError::Workflow(_) => "unknown_status",
            ApiError::Upload(e) => e.code(),
            ApiError::Persistence(_) => "persistence_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Persistence(ref e) = self {
            tracing::error!(error = %e, "persistence failure");
        }
        let body = ApiResponse::<()>::error(self.code(), &self.to_string());
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reporta_workflow::Status;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(ValidationError::MissingLocation).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::from(WorkflowError::Terminal(Status::Approved)).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(WorkflowError::UnknownStatus("done".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(UploadError::TooLarge { size: 10, max: 5 }).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(UploadError::UnsupportedType("text/html".into())).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::from(StoreError::Unavailable("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_form_error_mapping() {
        let err = ApiError::from(FormError::Validation(ValidationError::MissingLocation));
        assert_eq!(err.code(), ValidationError::MissingLocation.code());
        let err = ApiError::from(FormError::UnknownField("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
