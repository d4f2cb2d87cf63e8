//! Core use-case services.
//!
//! # Responsibility
//! - Load snapshots from the store, run the pure engines, save results.
//! - Keep CLI and UI layers decoupled from storage details.

pub mod graph_service;
pub mod habit_service;
pub mod note_service;
pub mod workspace_service;
