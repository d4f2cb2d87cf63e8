//! Habit streak and completion-rate calculation.
//!
//! # Responsibility
//! - Derive the consecutive-day streak from a habit's log set.
//! - Derive the trailing 30-day completion percentage.
//! - Toggle a day in a habit's logs and recompute its cached streak.
//!
//! # Invariants
//! - After `toggle_log` the returned habit's `streak` matches its `logs`.
//! - An unlogged `today` is skipped once; any other gap ends the streak.
//! - Dates after `today` never count toward either metric.

use crate::model::habit::Habit;
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Length of the completion-rate window, in calendar days.
pub const COMPLETION_WINDOW_DAYS: u32 = 30;

/// Counts consecutive logged days ending at `today`.
///
/// When `today` itself is not logged the walk starts from yesterday, so an
/// active streak survives until the current day is over.
pub fn compute_streak(logs: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    loop {
        if logs.contains(&day) {
            streak += 1;
        } else if day != today {
            break;
        }
        let Some(previous) = day.pred_opt() else {
            break;
        };
        day = previous;
    }
    streak
}

/// Percentage of the trailing window (ending at `today`) with a log entry.
///
/// Rounded half-up to the nearest integer.
pub fn completion_rate(logs: &BTreeSet<NaiveDate>, today: NaiveDate) -> u8 {
    let start = window_start(today);
    let logged = logs.range(start..=today).count() as u32;
    let percent = (logged * 100 + COMPLETION_WINDOW_DAYS / 2) / COMPLETION_WINDOW_DAYS;
    percent.min(100) as u8
}

/// Dates of the trailing window, oldest first, ending at `today`.
pub fn trailing_window(today: NaiveDate) -> Vec<NaiveDate> {
    let start = window_start(today);
    start.iter_days().take_while(|day| *day <= today).collect()
}

/// Returns a copy of `habit` with `date` toggled and `streak` recomputed.
pub fn toggle_log(habit: &Habit, date: NaiveDate, today: NaiveDate) -> Habit {
    let mut updated = habit.clone();
    if !updated.logs.remove(&date) {
        updated.logs.insert(date);
    }
    updated.streak = compute_streak(&updated.logs, today);
    updated
}

/// Longest cached streak among `habits`, `0` when there are none.
pub fn max_streak(habits: &[Habit]) -> u32 {
    habits.iter().map(|habit| habit.streak).max().unwrap_or(0)
}

fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(COMPLETION_WINDOW_DAYS - 1)))
        .unwrap_or(NaiveDate::MIN)
}
