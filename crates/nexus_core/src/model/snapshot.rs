//! Workspace import/export envelope.
//!
//! # Responsibility
//! - Parse and render the JSON document used for settings import/export.
//!
//! # Invariants
//! - A collection absent from an imported document is left untouched.
//! - Parsing never panics on malformed input.

use crate::model::habit::Habit;
use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Partial workspace document. Each collection is optional on import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<Vec<Habit>>,
}

/// Snapshot parse/render failure.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid workspace snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Parses an exported workspace document.
pub fn parse_snapshot(json: &str) -> Result<WorkspaceSnapshot, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Renders a workspace document as pretty JSON.
pub fn render_snapshot(snapshot: &WorkspaceSnapshot) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
