//! Calendar clock used for day-rollover and streak bookkeeping.

use chrono::{Local, NaiveDate, Utc};

/// Source of "today" and the current timestamp.
pub trait Clock: Send + Sync {
    /// Today's calendar date in the user's local time zone.
    fn today(&self) -> NaiveDate;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a given date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now_millis: i64,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        let now_millis = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { today, now_millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}
