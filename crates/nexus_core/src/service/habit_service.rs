//! Habit use-case service.
//!
//! # Responsibility
//! - Create, toggle, delete and summarize stored habits.
//! - Persist the habit value returned by the streak calculator.
//!
//! # Invariants
//! - A toggle writes `logs` and `streak` together; no stale-streak window.
//! - "Today" always comes from the injected clock.

use crate::habit::clock::Clock;
use crate::habit::streak::{completion_rate, toggle_log, trailing_window};
use crate::model::habit::{Habit, HabitId, HabitValidationError, NewHabitRequest};
use crate::repo::workspace_store::{StoreError, StoreResult, WorkspaceStore};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for habit use-cases.
#[derive(Debug)]
pub enum HabitServiceError {
    Validation(HabitValidationError),
    HabitNotFound(HabitId),
    Store(StoreError),
}

impl Display for HabitServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HabitServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::HabitNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<HabitValidationError> for HabitServiceError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for HabitServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One cell of the 30-day completion grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub done: bool,
}

/// Read model for one habit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    /// Cached streak as of the last toggle.
    pub streak: u32,
    pub completion_rate: u8,
    pub done_today: bool,
    pub window: Vec<DaySlot>,
}

impl HabitSummary {
    fn from_habit(habit: &Habit, today: NaiveDate) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            streak: habit.streak,
            completion_rate: completion_rate(&habit.logs, today),
            done_today: habit.is_done_on(today),
            window: trailing_window(today)
                .into_iter()
                .map(|date| DaySlot {
                    date,
                    done: habit.is_done_on(date),
                })
                .collect(),
        }
    }
}

/// Habit service facade over a workspace store and a clock.
pub struct HabitService<S: WorkspaceStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: WorkspaceStore, C: Clock> HabitService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        self.store.load_habits()
    }

    /// Creates a habit and stores it ahead of existing ones.
    pub fn create_habit(&self, request: &NewHabitRequest) -> Result<Habit, HabitServiceError> {
        let habit = Habit::new(request)?;
        let mut habits = self.store.load_habits()?;
        habits.insert(0, habit.clone());
        self.store.save_habits(&habits)?;
        info!(
            "event=habit_create module=service status=ok habit_id={}",
            habit.id
        );
        Ok(habit)
    }

    /// Toggles `date` for habit `id` and persists the recomputed streak.
    pub fn toggle_habit(&self, id: &str, date: NaiveDate) -> Result<Habit, HabitServiceError> {
        let mut habits = self.store.load_habits()?;
        let Some(slot) = habits.iter_mut().find(|habit| habit.id == id) else {
            warn!("event=habit_toggle module=service status=not_found habit_id={id}");
            return Err(HabitServiceError::HabitNotFound(id.to_string()));
        };

        let updated = toggle_log(slot, date, self.clock.today());
        *slot = updated.clone();
        self.store.save_habits(&habits)?;
        info!(
            "event=habit_toggle module=service status=ok habit_id={} date={} streak={}",
            updated.id, date, updated.streak
        );
        Ok(updated)
    }

    /// Toggles the current day for habit `id`.
    pub fn toggle_today(&self, id: &str) -> Result<Habit, HabitServiceError> {
        self.toggle_habit(id, self.clock.today())
    }

    pub fn delete_habit(&self, id: &str) -> Result<(), HabitServiceError> {
        let mut habits = self.store.load_habits()?;
        let before = habits.len();
        habits.retain(|habit| habit.id != id);
        if habits.len() == before {
            return Err(HabitServiceError::HabitNotFound(id.to_string()));
        }
        self.store.save_habits(&habits)?;
        info!("event=habit_delete module=service status=ok habit_id={id}");
        Ok(())
    }

    pub fn habit_summary(&self, id: &str) -> Result<HabitSummary, HabitServiceError> {
        let habits = self.store.load_habits()?;
        let habit = habits
            .iter()
            .find(|habit| habit.id == id)
            .ok_or_else(|| HabitServiceError::HabitNotFound(id.to_string()))?;
        Ok(HabitSummary::from_habit(habit, self.clock.today()))
    }

    /// Summaries for every stored habit, in stored order.
    pub fn summaries(&self) -> StoreResult<Vec<HabitSummary>> {
        Ok(self.summarize(&self.store.load_habits()?))
    }

    /// Summaries for an already loaded habit list.
    pub fn summarize(&self, habits: &[Habit]) -> Vec<HabitSummary> {
        let today = self.clock.today();
        habits
            .iter()
            .map(|habit| HabitSummary::from_habit(habit, today))
            .collect()
    }
}
