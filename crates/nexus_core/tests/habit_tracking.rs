use chrono::{Days, NaiveDate};
use nexus_core::db::open_db_in_memory;
use nexus_core::{
    FixedClock, HabitFrequency, HabitImpact, HabitService, HabitServiceError,
    HabitValidationError, NewHabitRequest, SqliteWorkspaceStore, WorkspaceStore,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn days_ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

#[test]
fn create_prepends_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));

    let first = service
        .create_habit(&NewHabitRequest::named("Deep Work (4h)"))
        .unwrap();
    let second = service
        .create_habit(&NewHabitRequest {
            name: "Knowledge Review".to_string(),
            frequency: HabitFrequency::Weekly,
            impact: HabitImpact::Low,
        })
        .unwrap();

    let stored = store.load_habits().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, second.id);
    assert_eq!(stored[1].id, first.id);
    assert_eq!(stored[0].frequency, HabitFrequency::Weekly);
}

#[test]
fn blank_names_are_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));

    let err = service
        .create_habit(&NewHabitRequest::named("  "))
        .unwrap_err();
    assert!(matches!(
        err,
        HabitServiceError::Validation(HabitValidationError::EmptyName)
    ));
    assert!(store.load_habits().unwrap().is_empty());
}

#[test]
fn toggle_persists_logs_and_streak_together() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));
    let habit = service.create_habit(&NewHabitRequest::named("Read")).unwrap();

    let after_yesterday = service.toggle_habit(&habit.id, days_ago(1)).unwrap();
    assert_eq!(after_yesterday.streak, 1, "yesterday counts while today is open");

    let after_today = service.toggle_today(&habit.id).unwrap();
    assert_eq!(after_today.streak, 2);

    let stored = store.load_habits().unwrap();
    assert_eq!(stored[0].streak, 2);
    assert!(stored[0].logs.contains(&today()));
    assert!(stored[0].logs.contains(&days_ago(1)));
}

#[test]
fn toggling_twice_restores_original_state() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));
    let habit = service.create_habit(&NewHabitRequest::named("Run")).unwrap();
    service.toggle_habit(&habit.id, days_ago(1)).unwrap();
    let before = store.load_habits().unwrap();

    service.toggle_habit(&habit.id, days_ago(3)).unwrap();
    service.toggle_habit(&habit.id, days_ago(3)).unwrap();

    assert_eq!(store.load_habits().unwrap(), before);
}

#[test]
fn two_day_gap_reports_zero() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));
    let habit = service.create_habit(&NewHabitRequest::named("Stretch")).unwrap();

    let updated = service.toggle_habit(&habit.id, days_ago(2)).unwrap();
    assert_eq!(updated.streak, 0);
}

#[test]
fn unknown_habit_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));

    assert!(matches!(
        service.toggle_today("missing"),
        Err(HabitServiceError::HabitNotFound(id)) if id == "missing"
    ));
    assert!(matches!(
        service.delete_habit("missing"),
        Err(HabitServiceError::HabitNotFound(_))
    ));
}

#[test]
fn summary_reports_rate_and_thirty_day_grid() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));
    let habit = service.create_habit(&NewHabitRequest::named("Journal")).unwrap();
    for offset in (0..30).step_by(2) {
        service.toggle_habit(&habit.id, days_ago(offset)).unwrap();
    }
    service.toggle_habit(&habit.id, days_ago(45)).unwrap();

    let summary = service.habit_summary(&habit.id).unwrap();
    assert_eq!(summary.completion_rate, 50);
    assert!(summary.done_today);
    assert_eq!(summary.streak, 1);
    assert_eq!(summary.window.len(), 30);
    assert_eq!(summary.window[29].date, today());
    assert!(summary.window[29].done);
    assert!(!summary.window[28].done);

    assert_eq!(service.summaries().unwrap().len(), 1);
    let loaded = service.list_habits().unwrap();
    assert_eq!(service.summarize(&loaded), vec![summary]);
}

#[test]
fn delete_removes_only_the_target() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    let service = HabitService::new(&store, FixedClock(today()));
    let keep = service.create_habit(&NewHabitRequest::named("Keep")).unwrap();
    let dropped = service.create_habit(&NewHabitRequest::named("Drop")).unwrap();

    service.delete_habit(&dropped.id).unwrap();
    let remaining = service.list_habits().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}
