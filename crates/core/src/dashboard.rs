//! Reporting window helpers for the dashboard aggregator.
//!
//! Growth metrics compare against the start of the current calendar month or
//! the start of the current week (Sunday-based, matching how the dashboard
//! presents "this week").

use chrono::{Datelike, Duration};

use crate::types::Timestamp;

/// Midnight UTC on the first day of `now`'s month.
pub fn start_of_month(now: Timestamp) -> Timestamp {
    now.date_naive()
        .with_day(1)
        .expect("day 1 always exists")
        .and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
        .and_utc()
}

/// Midnight UTC on the Sunday of `now`'s week.
pub fn start_of_week(now: Timestamp) -> Timestamp {
    let days_from_sunday = now.weekday().num_days_from_sunday() as i64;
    (now.date_naive() - Duration::days(days_from_sunday))
        .and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2025, 3, 17, 15, 42, 9).unwrap();
        let start = start_of_month(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_week_mid_week() {
        // 2025-03-19 is a Wednesday; the week began Sunday 2025-03-16.
        let now = Utc.with_ymd_and_hms(2025, 3, 19, 8, 0, 0).unwrap();
        let start = start_of_week(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_week_on_sunday() {
        let now = Utc.with_ymd_and_hms(2025, 3, 16, 23, 59, 59).unwrap();
        let start = start_of_week(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_start_can_cross_month_boundary() {
        // 2025-04-02 is a Wednesday; the week began Sunday 2025-03-30.
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap();
        let start = start_of_week(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 30, 0, 0, 0).unwrap());
    }
}
