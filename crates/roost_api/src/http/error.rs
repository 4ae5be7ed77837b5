use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::domain::DomainError;
use serde_json::json;
use tracing::error;

/// Domain error on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Status code and stable machine-readable code for a domain error
pub fn domain_error_status(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::OrganizationNotFound(_)
        | DomainError::RoomNotFound(_)
        | DomainError::DeviceNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::AccessDenied(_) => (StatusCode::FORBIDDEN, "access_denied"),
        DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        DomainError::PersistenceError(_) | DomainError::TokenIssuance(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = domain_error_status(&self.0);

        // storage details stay in the logs
        let message = match &self.0 {
            DomainError::PersistenceError(err) => {
                error!(error = ?err, "request failed in persistence layer");
                "internal error".to_string()
            }
            DomainError::TokenIssuance(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
