//! Habit consistency tracking.
//!
//! # Responsibility
//! - Compute streaks and trailing completion rates from habit logs.
//! - Provide the injectable calendar clock used by those computations.
//!
//! # Invariants
//! - Computations never read the wall clock directly; "today" is an input.

pub mod clock;
pub mod streak;
