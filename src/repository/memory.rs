//! In-memory [`NoteRepository`] used by the service and handler tests.

use async_trait::async_trait;
use chrono::Utc;

use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::{NoteRepository, StorageError};
use crate::models::{Note, NoteChanges};

#[derive(Default)]
struct State {
    notes: BTreeMap<i64, Note>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryNoteRepository {
    state: Mutex<State>,
    calls: AtomicUsize,
    broken: bool,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails as if the pool were gone.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Number of repository calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().notes.len()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, State>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(StorageError::Pool(deadpool_postgres::PoolError::Closed));
        }
        Ok(self.state.lock().unwrap())
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn create(&self, title: &str, content: &str) -> Result<Note, StorageError> {
        let mut state = self.enter()?;
        state.last_id += 1;
        let note = Note {
            id: state.last_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        state.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, StorageError> {
        Ok(self.enter()?.notes.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Note>, StorageError> {
        Ok(self.enter()?.notes.values().cloned().collect())
    }

    async fn update(&self, id: i64, changes: &NoteChanges) -> Result<bool, StorageError> {
        let mut state = self.enter()?;
        let Some(note) = state.notes.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(title) = &changes.title {
            note.title.clone_from(title);
        }
        if let Some(content) = &changes.content {
            note.content.clone_from(content);
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.enter()?.notes.remove(&id).is_some())
    }
}
