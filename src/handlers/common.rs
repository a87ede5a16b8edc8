use crate::errors::{ApiError, ServiceError};
use crate::ApiEnvelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Standard success response: wraps the payload in the uniform envelope and
/// echoes the status code into the body.
pub fn success_response<T: Serialize>(
    status: StatusCode,
    data: Option<T>,
    message: impl Into<String>,
) -> Response {
    let envelope = ApiEnvelope::success(data, message.into(), status.as_u16());

    (status, Json(envelope)).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}
