mod error;

pub use error::ApiError;

use axum::{
    Json,
    extract::{FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, ErrorResponse, HealthResponse, MessageResponse, NoteListResponse,
        NoteResponse, UpdateNoteRequest,
    },
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        create_note,
        update_note,
        delete_note,
        get_one_note,
        get_all_notes
    ),
    components(schemas(
        NoteResponse,
        NoteListResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        MessageResponse,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

/// Numeric note id taken from the `{id}` path segment. Only plain decimal
/// digits that fit in an `i64` are accepted; anything else is rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct NoteId(pub i64);

impl<S> FromRequestParts<S> for NoteId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_id())?;

        // `u64::from_str` tolerates a leading `+`
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::invalid_id());
        }

        raw.parse::<u64>()
            .ok()
            .and_then(|id| i64::try_from(id).ok())
            .map(Self)
            .ok_or_else(ApiError::invalid_id)
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn health_check() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            message: "Note service is running".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Missing or empty field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => ApiError::from_service(e, "create note").into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = MessageResponse),
        (status = 400, description = "Invalid ID or no fields to update", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    match service.update_note(id, payload).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Note updated successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from_service(e, "update note").into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(State(service): State<Arc<NoteService>>, NoteId(id): NoteId) -> Response {
    match service.delete_note(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Note deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from_service(e, "delete note").into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
) -> Response {
    match service.get_one_note(id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => ApiError::from_service(e, "get note").into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "List of all notes", body = NoteListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(NoteListResponse::from(notes))).into_response(),
        Err(e) => ApiError::from_service(e, "get notes").into_response(),
    }
}
