use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Uniform error envelope returned by every failing operation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "data": null,
    "message": "sorry this product not found to show",
    "success": false,
    "status": 404
}))]
pub struct ErrorBody {
    /// Always null on errors
    pub data: Option<serde_json::Value>,
    /// Human-readable error description
    #[schema(example = "sorry this product not found to show")]
    pub message: String,
    /// Always false on errors
    #[schema(example = false)]
    pub success: bool,
    /// HTTP status code echoed into the body
    #[schema(example = 404)]
    pub status: u16,
}

impl ErrorBody {
    pub fn new(message: String, status: StatusCode) -> Self {
        Self {
            data: None,
            message,
            success: false,
            status: status.as_u16(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Storage errors return a generic message to avoid leaking internal
    /// detail; the raw error is logged at the call site instead.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "database error, please try again later".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody::new(self.response_message(), status);

        (status, Json(body)).into_response()
    }
}

/// API error type for HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::ServiceError(service_error) => (
                service_error.status_code(),
                service_error.response_message(),
            ),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorBody::new(message, status))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DatabaseError(sea_orm::DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_error_message_is_redacted() {
        let err = ServiceError::DatabaseError(sea_orm::DbErr::Custom("secret detail".into()));
        assert_eq!(err.response_message(), "database error, please try again later");

        // User-facing errors keep their exact message
        assert_eq!(
            ServiceError::NotFound("sorry this product not found to show".into())
                .response_message(),
            "sorry this product not found to show"
        );
    }

    #[tokio::test]
    async fn error_response_uses_uniform_envelope() {
        let response = ServiceError::Conflict("already exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert!(payload.data.is_none());
        assert!(!payload.success);
        assert_eq!(payload.status, 409);
        assert_eq!(payload.message, "already exist");
    }
}
