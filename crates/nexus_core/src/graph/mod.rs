//! Note reference graph: extraction, resolution, derivation and layout.
//!
//! # Responsibility
//! - Turn a note snapshot into nodes, edges and degrees.
//! - Lay the derived graph out in 2-D for the graph view.
//!
//! # Invariants
//! - Everything here is a pure function of its inputs; no storage access.
//! - Graph data is derived on demand and never persisted.

pub mod builder;
pub mod layout;
pub mod links;
pub mod resolve;
