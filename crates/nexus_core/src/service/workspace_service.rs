//! Workspace import/export use-cases.
//!
//! # Invariants
//! - Import replaces only the collections present in the document.
//! - A malformed document changes nothing.
//! - Present collections are written in one store call; a failed write leaves
//!   the previous workspace in place.

use crate::model::snapshot::{parse_snapshot, render_snapshot, SnapshotError, WorkspaceSnapshot};
use crate::repo::workspace_store::{StoreError, WorkspaceStore};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WorkspaceServiceError {
    Snapshot(SnapshotError),
    Store(StoreError),
}

impl Display for WorkspaceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkspaceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for WorkspaceServiceError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<StoreError> for WorkspaceServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Counts of replaced collections; `None` when a collection was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub notes: Option<usize>,
    pub habits: Option<usize>,
}

pub struct WorkspaceService<S: WorkspaceStore> {
    store: S,
}

impl<S: WorkspaceStore> WorkspaceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Imports an exported workspace document.
    pub fn import_snapshot(&self, json: &str) -> Result<ImportReport, WorkspaceServiceError> {
        let snapshot = parse_snapshot(json).map_err(|err| {
            warn!("event=workspace_import module=service status=rejected error={err}");
            err
        })?;

        self.store
            .replace_collections(snapshot.notes.as_deref(), snapshot.habits.as_deref())
            .map_err(|err| {
                warn!("event=workspace_import module=service status=error error={err}");
                err
            })?;
        let report = ImportReport {
            notes: snapshot.notes.as_ref().map(Vec::len),
            habits: snapshot.habits.as_ref().map(Vec::len),
        };

        info!(
            "event=workspace_import module=service status=ok notes={:?} habits={:?}",
            report.notes, report.habits
        );
        Ok(report)
    }

    /// Renders every stored collection as one document.
    pub fn export_snapshot(&self) -> Result<String, WorkspaceServiceError> {
        let snapshot = WorkspaceSnapshot {
            notes: Some(self.store.load_notes()?),
            habits: Some(self.store.load_habits()?),
        };
        Ok(render_snapshot(&snapshot)?)
    }
}
