//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use till_commerce::CommerceError;

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid or missing credentials")
    }

    /// Downgrade a validation failure to 400, as the shipping step reports
    /// missing fields with Bad Request rather than Unprocessable Entity.
    pub fn shipping(error: CommerceError) -> Self {
        match error {
            CommerceError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            other => other.into(),
        }
    }
}

impl From<CommerceError> for ApiError {
    fn from(error: CommerceError) -> Self {
        let status = match &error {
            CommerceError::Validation(_)
            | CommerceError::InvalidStatusTransition { .. }
            | CommerceError::InsufficientStock { .. }
            | CommerceError::Overflow => StatusCode::UNPROCESSABLE_ENTITY,
            CommerceError::ProductNotFound(_)
            | CommerceError::CartLineNotFound(_)
            | CommerceError::OrderNotFound(_)
            | CommerceError::UserNotFound(_)
            | CommerceError::LogEntryNotFound(_) => StatusCode::NOT_FOUND,
            CommerceError::EmptyCart => StatusCode::BAD_REQUEST,
            CommerceError::Unauthorized => StatusCode::UNAUTHORIZED,
            CommerceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Storage details stay in the logs, not in the response.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            error.to_string()
        };
        Self::new(status, message)
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
