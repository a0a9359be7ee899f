//! Wall-clock gate for the once-a-day run.
//!
//! The external scheduler fires at fixed UTC times, which land on different
//! local hours across daylight-saving changes. A run only proceeds when the
//! local hour in the configured zone equals the target hour. Any minute inside
//! that hour qualifies so a few minutes of scheduler jitter still counts.

use chrono::{DateTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Convert an instant into local time for `tz`
pub fn local_now<Z: TimeZone>(now: &DateTime<Z>, tz: Tz) -> DateTime<Tz> {
    now.with_timezone(&tz)
}

pub fn should_run<Z: TimeZone>(now: &DateTime<Z>, tz: Tz, target_hour: u32) -> bool {
    local_now(now, tz).hour() == target_hour
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Europe::Berlin;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_winter_and_summer_offsets() {
        // CET: 10:00 Berlin is 09:00 UTC
        assert!(should_run(&utc(2025, 1, 15, 9, 0), Berlin, 10));
        assert!(!should_run(&utc(2025, 1, 15, 8, 0), Berlin, 10));
        // CEST: 10:00 Berlin is 08:00 UTC
        assert!(should_run(&utc(2025, 7, 15, 8, 0), Berlin, 10));
        assert!(!should_run(&utc(2025, 7, 15, 9, 0), Berlin, 10));
    }

    #[test]
    fn test_minutes_inside_target_hour_qualify() {
        assert!(should_run(&utc(2025, 1, 15, 9, 7), Berlin, 10));
        assert!(should_run(&utc(2025, 1, 15, 9, 59), Berlin, 10));
        assert!(!should_run(&utc(2025, 1, 15, 10, 0), Berlin, 10));
    }

    #[test]
    fn test_spring_forward() {
        // Clocks jump 02:00 CET -> 03:00 CEST at 01:00 UTC on 2025-03-30
        assert!(should_run(&utc(2025, 3, 29, 9, 30), Berlin, 10));
        assert!(!should_run(&utc(2025, 3, 29, 8, 30), Berlin, 10));
        assert!(should_run(&utc(2025, 3, 31, 8, 30), Berlin, 10));
        assert!(!should_run(&utc(2025, 3, 31, 9, 30), Berlin, 10));

        // 02:xx never happens locally that night
        assert!(should_run(&utc(2025, 3, 30, 0, 59), Berlin, 1));
        assert!(should_run(&utc(2025, 3, 30, 1, 0), Berlin, 3));
        for minute in [0, 30, 59] {
            assert!(!should_run(&utc(2025, 3, 30, 0, minute), Berlin, 2));
            assert!(!should_run(&utc(2025, 3, 30, 1, minute), Berlin, 2));
        }
    }

    #[test]
    fn test_fall_back() {
        // Clocks fall 03:00 CEST -> 02:00 CET at 01:00 UTC on 2025-10-26
        assert!(should_run(&utc(2025, 10, 25, 8, 15), Berlin, 10));
        assert!(!should_run(&utc(2025, 10, 25, 9, 15), Berlin, 10));
        assert!(should_run(&utc(2025, 10, 27, 9, 15), Berlin, 10));
        assert!(!should_run(&utc(2025, 10, 27, 8, 15), Berlin, 10));

        // 02:xx happens twice locally
        assert!(should_run(&utc(2025, 10, 26, 0, 30), Berlin, 2));
        assert!(should_run(&utc(2025, 10, 26, 1, 30), Berlin, 2));
    }

    #[test]
    fn test_local_date_follows_zone() {
        // 23:30 UTC on New Year's Eve is already the next day in Berlin
        let local = local_now(&utc(2025, 12, 31, 23, 30), Berlin);
        assert_eq!(local.date_naive().to_string(), "2026-01-01");
    }
}
