//! Persistence boundary for workspace collections.
//!
//! # Responsibility
//! - Define the store contract consumed by services.
//! - Keep SQL details out of the derivation engines and services.
//!
//! # Invariants
//! - Pure engines (`graph`, `habit`) never depend on this module.

pub mod workspace_store;
