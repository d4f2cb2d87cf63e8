//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit record and its creation rules.
//!
//! # Invariants
//! - `logs` holds at most one entry per calendar day.
//! - `streak` is only written by the streak calculator after a toggle.
//! - `name` is trimmed and never blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque habit identifier.
pub type HabitId = String;

/// How often a habit is expected to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
}

/// Self-assessed importance of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitImpact {
    Low,
    #[default]
    High,
}

/// Canonical habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// Cached consecutive-day streak, recomputed on every toggle.
    #[serde(default)]
    pub streak: u32,
    /// Completed calendar days, serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub logs: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub impact: HabitImpact,
}

/// Validation failure for habit creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    EmptyName,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name cannot be empty"),
        }
    }
}

impl Error for HabitValidationError {}

/// Input for creating a habit. Defaults match a new daily, high-impact ritual.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewHabitRequest {
    pub name: String,
    pub frequency: HabitFrequency,
    pub impact: HabitImpact,
}

impl NewHabitRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Habit {
    /// Creates a habit with a generated id, empty logs and zero streak.
    ///
    /// # Errors
    /// - Returns `EmptyName` when the trimmed name is empty.
    pub fn new(request: &NewHabitRequest) -> Result<Self, HabitValidationError> {
        Self::with_id(Uuid::new_v4().to_string(), request)
    }

    /// Creates a habit with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: impl Into<HabitId>,
        request: &NewHabitRequest,
    ) -> Result<Self, HabitValidationError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }

        Ok(Self {
            id: id.into(),
            name: name.to_string(),
            streak: 0,
            logs: BTreeSet::new(),
            frequency: request.frequency,
            impact: request.impact,
        })
    }

    /// Returns whether the habit was marked complete on `day`.
    pub fn is_done_on(&self, day: NaiveDate) -> bool {
        self.logs.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitFrequency, HabitImpact, HabitValidationError, NewHabitRequest};
    use chrono::NaiveDate;

    #[test]
    fn new_habit_trims_name_and_uses_defaults() {
        let habit = Habit::new(&NewHabitRequest::named("  Deep Work (4h) ")).unwrap();
        assert_eq!(habit.name, "Deep Work (4h)");
        assert_eq!(habit.frequency, HabitFrequency::Daily);
        assert_eq!(habit.impact, HabitImpact::High);
        assert_eq!(habit.streak, 0);
        assert!(habit.logs.is_empty());
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Habit::new(&NewHabitRequest::named("   ")).unwrap_err();
        assert_eq!(err, HabitValidationError::EmptyName);
    }

    #[test]
    fn serializes_with_uppercase_enums_and_iso_dates() {
        let mut habit = Habit::with_id("h1", &NewHabitRequest::named("Knowledge Review")).unwrap();
        habit
            .logs
            .insert(NaiveDate::from_ymd_opt(2023, 10, 25).unwrap());
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["frequency"], "DAILY");
        assert_eq!(value["impact"], "HIGH");
        assert_eq!(value["logs"][0], "2023-10-25");
    }

    #[test]
    fn deserializes_exported_habit() {
        let json = r#"{"id":"h2","name":"Knowledge Review","streak":5,
            "logs":["2023-10-25","2023-10-24"],"frequency":"WEEKLY","impact":"LOW"}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.logs.len(), 2);
        assert_eq!(habit.frequency, HabitFrequency::Weekly);
        assert_eq!(habit.impact, HabitImpact::Low);
        assert!(habit.is_done_on(NaiveDate::from_ymd_opt(2023, 10, 24).unwrap()));
    }
}
