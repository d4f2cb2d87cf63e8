//! Core domain logic for NEXUS.
//!
//! Pure engines (`graph`, `habit`) derive data from snapshots handed in by
//! callers. The `service` layer owns loading and saving through `repo`.

pub mod config;
pub mod db;
pub mod graph;
pub mod habit;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, NexusConfig};
pub use graph::builder::{
    build_graph, graph_stats, label_offset, node_radius, GraphEdge, GraphNode, GraphStats,
    KnowledgeGraph,
};
pub use graph::layout::{
    layout, step, Canvas, DragState, ForceConfig, ForceSimulation, LayoutEvent, LayoutState,
    NodePosition, SimulationStatus, TickOutcome, ViewTransform,
};
pub use graph::links::extract_links;
pub use graph::resolve::resolve_title;
pub use habit::clock::{Clock, FixedClock, LocalClock};
pub use habit::streak::{completion_rate, compute_streak, max_streak, toggle_log, trailing_window};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::habit::{Habit, HabitFrequency, HabitId, HabitImpact, HabitValidationError, NewHabitRequest};
pub use model::note::{NewNoteRequest, Note, NoteId, NoteUpdate};
pub use model::snapshot::{parse_snapshot, SnapshotError, WorkspaceSnapshot};
pub use repo::workspace_store::{SqliteWorkspaceStore, StoreError, StoreResult, WorkspaceStore};
pub use service::graph_service::{GraphLayout, GraphService};
pub use service::habit_service::{DaySlot, HabitService, HabitServiceError, HabitSummary};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::workspace_service::{ImportReport, WorkspaceService, WorkspaceServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
