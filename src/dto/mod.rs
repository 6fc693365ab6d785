use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Note, NoteChanges};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time, set by the server
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, 1 to 255 characters
    pub title: String,
    /// Note content
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// New title, left unchanged when absent
    #[serde(default)]
    pub title: Option<String>,
    /// New content, left unchanged when absent
    #[serde(default)]
    pub content: Option<String>,
}

impl From<UpdateNoteRequest> for NoteChanges {
    fn from(request: UpdateNoteRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<NoteResponse>,
    /// Present only when there are no notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
}

impl From<Vec<NoteResponse>> for NoteListResponse {
    fn from(notes: Vec<NoteResponse>) -> Self {
        let message = notes.is_empty().then(|| "No notes found".to_string());
        Self {
            count: notes.len(),
            notes,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
