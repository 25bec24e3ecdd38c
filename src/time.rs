//! Clock abstraction so date-sensitive logic (daily reset, streaks,
//! timestamping) stays deterministic under test.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;

/// Source of the current instant. "Today" is the UTC calendar date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for tests.
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Noon on the given date, so date arithmetic never straddles midnight.
    pub fn at_date(date: NaiveDate) -> Self {
        let now = date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12);
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.write();
        *now = *now + Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
