//! Calendar-day clock abstraction.

use chrono::{Local, NaiveDate, NaiveTime};

/// Source of the caller's current calendar day and timestamp.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Unix epoch milliseconds, used for record timestamps.
    fn now_millis(&self) -> i64;
}

/// Local-timezone system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Clock pinned to one day. Timestamps read as midnight UTC of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now_millis(&self) -> i64 {
        self.0.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
