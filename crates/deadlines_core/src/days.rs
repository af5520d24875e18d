//! Calendar-day arithmetic for deadlines.
//!
//! # Responsibility
//! - Convert a stored calendar date into a signed "days until" value.
//! - Render day-counts as short display labels.
//! - Provide the `Clock` seam that supplies local "now".
//!
//! # Invariants
//! - Only the calendar day matters; time-of-day never changes a day-count.
//! - Past dates are reported as negative (overdue), never rolled forward.
//! - Day-counts are recomputed on demand and never cached across days.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, TimeZone};
use std::sync::{Arc, Mutex};

/// Returns `target - today` in whole calendar days.
///
/// Positive means future, zero means today, negative means overdue.
pub fn days_until(today: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// Same as [`days_until`], truncating `now` to its local calendar day first.
pub fn days_until_at<Tz: TimeZone>(now: &DateTime<Tz>, target: NaiveDate) -> i64 {
    days_until(now.date_naive(), target)
}

/// Display label for a day-count.
pub fn days_until_text(days: i64) -> String {
    match days {
        d if d < 0 => "Overdue!".to_string(),
        0 => "Today!".to_string(),
        1 => "1 day".to_string(),
        d => format!("{d} days"),
    }
}

/// Time remaining from `now` until the next local midnight.
///
/// Recomputed per call from the current offset so clock adjustments are
/// picked up on the next schedule instead of accumulating drift. Always
/// returns a strictly positive duration.
pub fn duration_until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let next_day = now
        .date_naive()
        .succ_opt()
        .unwrap_or(NaiveDate::MAX);
    let next_midnight = next_day.and_time(chrono::NaiveTime::MIN);
    let remaining = next_midnight.signed_duration_since(now.naive_local());
    if remaining <= Duration::zero() {
        Duration::seconds(1)
    } else {
        remaining
    }
}

/// Source of the current local date-time.
pub trait Clock {
    /// Current wall-clock time in the local calendar, with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the host's local timezone, read at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Settable clock shared between clones.
///
/// Used by tests and by hosts that drive time explicitly.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Builds a clock at noon UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date.and_time(chrono::NaiveTime::MIN) + Duration::hours(12);
        Self::new(noon.and_utc().fixed_offset())
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        *guard += by;
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<FixedOffset>> {
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.lock()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
