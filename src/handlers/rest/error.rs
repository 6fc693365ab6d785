use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::ErrorResponse, service::NoteServiceError};

/// Error rendered as `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn invalid_id() -> Self {
        Self::bad_request("Invalid note ID")
    }

    /// `action` completes "Failed to ..." for storage failures.
    pub fn from_service(e: NoteServiceError, action: &str) -> Self {
        match e {
            NoteServiceError::Validation(message) => Self::bad_request(message),
            NoteServiceError::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                message: NoteServiceError::NotFound.to_string(),
            },
            NoteServiceError::Storage(e) => {
                tracing::error!("failed to {action}: {e}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Failed to {action}: {e}"),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid input: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
