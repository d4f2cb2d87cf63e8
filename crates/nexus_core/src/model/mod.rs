//! Domain data shapes owned by the application layer.
//!
//! # Responsibility
//! - Define the note, habit and snapshot records exchanged with callers.
//! - Keep JSON field naming compatible with exported workspace files.
//!
//! # Invariants
//! - Notes are identified by `id`, but cross-referenced by `title`.
//! - `Habit::streak` is derived from `Habit::logs` and never edited directly.

pub mod habit;
pub mod note;
pub mod snapshot;
