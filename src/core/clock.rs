//! Calendar access for streak and history calculations.
//!
//! Day boundaries are device-local. Production code uses [`SystemClock`];
//! tests use [`FixedClock`], which treats UTC as the local zone.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Milliseconds in a 24-hour day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of the current instant and of local calendar days.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar day containing `at`.
    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate;

    /// Epoch milliseconds of local midnight at the start of `day`.
    fn day_start_millis(&self, day: NaiveDate) -> i64;

    /// Today's local calendar day.
    fn today(&self) -> NaiveDate {
        self.local_day(self.now())
    }
}

/// Wall clock in the device's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }

    fn day_start_millis(&self, day: NaiveDate) -> i64 {
        let midnight = day.and_time(NaiveTime::MIN);
        // Midnight can fall in a DST gap; fall back to the UTC reading then.
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
    }
}

/// A frozen clock whose local zone is UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Freeze the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Freeze the clock at noon of the given day.
    pub fn at_noon(day: NaiveDate) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(day.and_time(noon).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.date_naive()
    }

    fn day_start_millis(&self, day: NaiveDate) -> i64 {
        day.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }
}

/// Whole days between two local calendar days.
///
/// Measured as the absolute distance between the two local midnights in
/// milliseconds, divided by one day and rounded up. Across a DST change this
/// can differ from the plain calendar difference.
pub fn day_gap(clock: &dyn Clock, today: NaiveDate, last: NaiveDate) -> i64 {
    let diff = (clock.day_start_millis(today) - clock.day_start_millis(last)).abs();
    (diff + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_today() {
        let clock = FixedClock::at_noon(day(2026, 10, 16));
        assert_eq!(clock.today(), day(2026, 10, 16));
    }

    #[test]
    fn test_day_gap_same_day() {
        let clock = FixedClock::at_noon(day(2026, 10, 16));
        assert_eq!(day_gap(&clock, day(2026, 10, 16), day(2026, 10, 16)), 0);
    }

    #[test]
    fn test_day_gap_yesterday_and_older() {
        let clock = FixedClock::at_noon(day(2026, 10, 16));
        assert_eq!(day_gap(&clock, day(2026, 10, 16), day(2026, 10, 15)), 1);
        assert_eq!(day_gap(&clock, day(2026, 10, 16), day(2026, 10, 13)), 3);
    }

    #[test]
    fn test_day_gap_is_absolute() {
        let clock = FixedClock::at_noon(day(2026, 10, 16));
        assert_eq!(day_gap(&clock, day(2026, 10, 16), day(2026, 10, 17)), 1);
    }

    #[test]
    fn test_day_gap_across_month_boundary() {
        let clock = FixedClock::at_noon(day(2026, 3, 1));
        assert_eq!(day_gap(&clock, day(2026, 3, 1), day(2026, 2, 28)), 1);
    }

    #[test]
    fn test_system_clock_midnight_is_start_of_day() {
        let clock = SystemClock;
        let today = clock.today();
        let start = clock.day_start_millis(today);
        assert!(start <= clock.now().timestamp_millis());
    }
}
