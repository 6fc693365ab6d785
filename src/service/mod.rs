use crate::{
    config::MAX_TITLE_LEN,
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    models::NoteChanges,
    repository::{NoteRepository, StorageError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Note not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl NoteServiceError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

fn validate_title(title: &str) -> Result<(), NoteServiceError> {
    if title.is_empty() {
        return Err(NoteServiceError::validation("Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(NoteServiceError::validation(format!(
            "Title cannot be longer than {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), NoteServiceError> {
    if content.is_empty() {
        return Err(NoteServiceError::validation("Content cannot be empty"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        validate_title(&request.title)?;
        validate_content(&request.content)?;

        let note = self.repo.create(&request.title, &request.content).await?;
        tracing::debug!("Created note {}", note.id);

        Ok(note.into())
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, NoteServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(NoteServiceError::NotFound)
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, NoteServiceError> {
        let notes = self.repo.get_all().await?;
        Ok(notes.into_iter().map(Into::into).collect())
    }

    /// Applies only the fields present in `request`. Existence is decided by
    /// the update statement itself.
    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<(), NoteServiceError> {
        let changes = NoteChanges::from(request);
        if changes.is_empty() {
            return Err(NoteServiceError::validation("No fields to update"));
        }
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(content) = &changes.content {
            validate_content(content)?;
        }

        if self.repo.update(id, &changes).await? {
            tracing::debug!("Updated note {id}");
            Ok(())
        } else {
            Err(NoteServiceError::NotFound)
        }
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), NoteServiceError> {
        if self.repo.delete(id).await? {
            tracing::debug!("Deleted note {id}");
            Ok(())
        } else {
            Err(NoteServiceError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::memory::MemoryNoteRepository;

    fn service() -> (NoteService, Arc<MemoryNoteRepository>) {
        let repo = Arc::new(MemoryNoteRepository::new());
        (NoteService::new(repo.clone()), repo)
    }

    fn create(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips_fields() {
        let (service, _) = service();

        let created = service
            .create_note(create("Groceries", "Milk, eggs"))
            .await
            .unwrap();
        let fetched = service.get_one_note(created.id).await.unwrap();

        assert_eq!(fetched.title, "Groceries");
        assert_eq!(fetched.content, "Milk, eggs");
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn create_rejects_empty_fields_without_touching_storage() {
        let (service, repo) = service();

        let err = service.create_note(create("", "body")).await.unwrap_err();
        assert!(matches!(err, NoteServiceError::Validation(m) if m == "Title cannot be empty"));

        let err = service.create_note(create("title", "")).await.unwrap_err();
        assert!(matches!(err, NoteServiceError::Validation(m) if m == "Content cannot be empty"));

        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn title_length_is_counted_in_characters() {
        let (service, _) = service();

        let longest = "é".repeat(MAX_TITLE_LEN);
        assert!(service.create_note(create(&longest, "x")).await.is_ok());

        let too_long = "a".repeat(MAX_TITLE_LEN + 1);
        let err = service.create_note(create(&too_long, "x")).await.unwrap_err();
        assert!(matches!(err, NoteServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_validation_error() {
        let (service, repo) = service();
        let note = service.create_note(create("a", "b")).await.unwrap();

        let err = service
            .update_note(note.id, UpdateNoteRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, NoteServiceError::Validation(m) if m == "No fields to update"));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let (service, _) = service();
        let note = service.create_note(create("Title", "old")).await.unwrap();

        service
            .update_note(
                note.id,
                UpdateNoteRequest {
                    title: None,
                    content: Some("new".to_string()),
                },
            )
            .await
            .unwrap();

        let updated = service.get_one_note(note.id).await.unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "new");
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn update_of_missing_note_is_not_found() {
        let (service, _) = service();

        let err = service
            .update_note(
                7,
                UpdateNoteRequest {
                    title: Some("t".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, NoteServiceError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_note_once() {
        let (service, _) = service();
        let note = service.create_note(create("a", "b")).await.unwrap();

        service.delete_note(note.id).await.unwrap();

        assert!(matches!(
            service.get_one_note(note.id).await,
            Err(NoteServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete_note(note.id).await,
            Err(NoteServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        let service = NoteService::new(Arc::new(MemoryNoteRepository::broken()));

        let err = service.get_all_notes().await.unwrap_err();
        assert!(matches!(err, NoteServiceError::Storage(_)));
    }
}
