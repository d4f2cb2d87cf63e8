//! Note use-case service.
//!
//! # Responsibility
//! - Create, edit and delete stored notes.
//!
//! # Invariants
//! - New notes are stored ahead of existing ones.
//! - Every edit stamps `updated_at` from the injected clock.
//! - The graph is never cached here; the next build sees the edit.

use crate::habit::clock::Clock;
use crate::model::note::{NewNoteRequest, Note, NoteId, NoteUpdate};
use crate::repo::workspace_store::{StoreError, StoreResult, WorkspaceStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    NoteNotFound(NoteId),
    Store(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Note service facade over a workspace store and a clock.
pub struct NoteService<S: WorkspaceStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: WorkspaceStore, C: Clock> NoteService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn list_notes(&self) -> StoreResult<Vec<Note>> {
        self.store.load_notes()
    }

    pub fn get_note(&self, id: &str) -> StoreResult<Option<Note>> {
        Ok(self
            .store
            .load_notes()?
            .into_iter()
            .find(|note| note.id == id))
    }

    /// Creates a note and stores it ahead of existing ones.
    pub fn create_note(&self, request: &NewNoteRequest) -> StoreResult<Note> {
        let note = Note::from_request(request, self.clock.now_millis());
        let mut notes = self.store.load_notes()?;
        notes.insert(0, note.clone());
        self.store.save_notes(&notes)?;
        info!(
            "event=note_create module=service status=ok note_id={} notes={}",
            note.id,
            notes.len()
        );
        Ok(note)
    }

    /// Applies `update` to note `id`. A renamed title changes which markers
    /// resolve to it on the next graph build.
    pub fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Note, NoteServiceError> {
        let mut notes = self.store.load_notes()?;
        let Some(slot) = notes.iter_mut().find(|note| note.id == id) else {
            warn!("event=note_update module=service status=not_found note_id={id}");
            return Err(NoteServiceError::NoteNotFound(id.to_string()));
        };

        let renamed = update.title.is_some();
        slot.apply(update, self.clock.now_millis());
        let updated = slot.clone();
        self.store.save_notes(&notes)?;
        info!("event=note_update module=service status=ok note_id={id} renamed={renamed}");
        Ok(updated)
    }

    pub fn delete_note(&self, id: &str) -> Result<(), NoteServiceError> {
        let mut notes = self.store.load_notes()?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            warn!("event=note_delete module=service status=not_found note_id={id}");
            return Err(NoteServiceError::NoteNotFound(id.to_string()));
        }
        self.store.save_notes(&notes)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }
}
