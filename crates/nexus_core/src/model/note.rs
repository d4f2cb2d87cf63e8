//! Note domain model.
//!
//! # Responsibility
//! - Define the note record read by the graph engines.
//!
//! # Invariants
//! - `id` is stable for the note lifetime.
//! - `title` is the only key used by wiki-link resolution.
//! - `folder` is an opaque grouping label and never affects topology.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque note identifier.
///
/// Imported workspaces use short free-form ids (`"1"`, `"k3j9x0a2b"`), so ids
/// are kept as strings instead of UUIDs.
pub type NoteId = String;

/// Folder assigned when an imported note carries none.
pub const DEFAULT_FOLDER: &str = "General";

/// Title given to a note created without one.
pub const UNTITLED_TITLE: &str = "Untitled Insight";

/// Input for creating a note. Empty `title` and `folder` fall back to
/// [`UNTITLED_TITLE`] and [`DEFAULT_FOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNoteRequest {
    pub title: String,
    pub content: String,
    pub folder: String,
}

/// Partial note edit; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder: Option<String>,
    pub pinned: Option<bool>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.folder.is_none()
            && self.pinned.is_none()
    }
}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// Display title, also the wiki-link target key.
    pub title: String,
    /// Free-text markdown body scanned for `[[Title]]` markers.
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl Note {
    /// Creates a note in the default folder with zeroed timestamps.
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            folder: default_folder(),
            created_at: 0,
            updated_at: 0,
            pinned: None,
        }
    }

    /// Creates an unpinned note with a fresh UUID v4 id stamped at `now_millis`.
    pub fn from_request(request: &NewNoteRequest, now_millis: i64) -> Self {
        let title = if request.title.is_empty() {
            UNTITLED_TITLE
        } else {
            request.title.as_str()
        };
        let folder = if request.folder.is_empty() {
            DEFAULT_FOLDER
        } else {
            request.folder.as_str()
        };
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: request.content.clone(),
            tags: Vec::new(),
            folder: folder.to_string(),
            created_at: now_millis,
            updated_at: now_millis,
            pinned: Some(false),
        }
    }

    /// Applies `update` and stamps `updated_at`, even for an empty update.
    pub fn apply(&mut self, update: NoteUpdate, now_millis: i64) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(folder) = update.folder {
            self.folder = folder;
        }
        if let Some(pinned) = update.pinned {
            self.pinned = Some(pinned);
        }
        self.updated_at = now_millis;
    }

    /// Returns a copy placed in `folder`.
    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}
