//! Calendar clock.
//!
//! Schedule generation depends on "today". Both clocks read time through a
//! [`SafeTimeProvider`]: [`SystemClock`] from the system source,
//! [`FixedClock`] from a test source.

use chrono::{Local, NaiveDate, NaiveTime};
use hourglass_rs::{SafeTimeProvider, TimeSource};

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date.
pub struct SystemClock {
    time: SafeTimeProvider,
}

impl SystemClock {
    /// Clock over the system time source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: SafeTimeProvider::new(TimeSource::System),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.time.now().with_timezone(&Local).date_naive()
    }
}

/// Returns a controlled date: midnight UTC of the given day.
pub struct FixedClock {
    time: SafeTimeProvider,
}

impl FixedClock {
    /// Clock that reports `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            time: SafeTimeProvider::new(TimeSource::Test(start)),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.time.now().date_naive()
    }
}
