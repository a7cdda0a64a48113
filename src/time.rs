//! Per-constellation timestamp resolution.
//!
//! Wraps the UTC week-start tracking state a GNSS session needs to turn a
//! week-relative millisecond timestamp into an absolute instant. Callers
//! own one `TimestampResolver` per session and pass it explicitly into
//! decode calls; there is no module-level mutable state.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::constants::{BEIDOU_LEAP_SECONDS, GLONASS_UTC_OFFSET_HOURS, GPS_LEAP_SECONDS, MS_PER_DAY};
use crate::error::TimeError;

const MAX_WEEK_TIMESTAMP_MS: u32 = 604_799_999;

/// Per-session GNSS week-tracking state.
#[derive(Debug, Clone)]
pub struct TimestampResolver {
    start_of_gps_week: DateTime<Utc>,
    start_of_galileo_week: DateTime<Utc>,
    start_of_beidou_week: DateTime<Utc>,
    start_of_glonass_week: DateTime<Utc>,
    last_gps_timestamp: u32,
    last_galileo_timestamp: u32,
    last_beidou_timestamp: u32,
    last_glonass_day: u8,
}

impl TimestampResolver {
    /// Initialises all four week anchors from a wall-clock UTC instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        let start_of_gps_week = leap_adjusted_week_start(now, GPS_LEAP_SECONDS);
        let start_of_beidou_week = leap_adjusted_week_start(now, BEIDOU_LEAP_SECONDS);
        Self {
            start_of_gps_week,
            start_of_galileo_week: start_of_gps_week,
            start_of_beidou_week,
            start_of_glonass_week: glonass_week_start(now),
            last_gps_timestamp: ms_since(start_of_gps_week, now),
            last_galileo_timestamp: ms_since(start_of_gps_week, now),
            last_beidou_timestamp: ms_since(start_of_beidou_week, now),
            last_glonass_day: moscow_weekday(now),
        }
    }

    pub fn resolve_gps(&mut self, timestamp: u32) -> Result<DateTime<Utc>, TimeError> {
        Self::resolve_week_relative(timestamp, &mut self.start_of_gps_week, &mut self.last_gps_timestamp)
    }

    pub fn resolve_galileo(&mut self, timestamp: u32) -> Result<DateTime<Utc>, TimeError> {
        Self::resolve_week_relative(timestamp, &mut self.start_of_galileo_week, &mut self.last_galileo_timestamp)
    }

    pub fn resolve_beidou(&mut self, timestamp: u32) -> Result<DateTime<Utc>, TimeError> {
        Self::resolve_week_relative(timestamp, &mut self.start_of_beidou_week, &mut self.last_beidou_timestamp)
    }

    fn resolve_week_relative(timestamp: u32, start_of_week: &mut DateTime<Utc>, last_timestamp: &mut u32) -> Result<DateTime<Utc>, TimeError> {
        if timestamp > MAX_WEEK_TIMESTAMP_MS {
            return Err(TimeError::TimestampOutOfRange { timestamp });
        }
        if timestamp < *last_timestamp {
            *start_of_week += Duration::days(7);
        }
        *last_timestamp = timestamp;
        Ok(*start_of_week + Duration::milliseconds(i64::from(timestamp)))
    }

    pub fn resolve_glonass(&mut self, timestamp: u32) -> Result<DateTime<Utc>, TimeError> {
        let day = ((timestamp >> 27) & 0x7) as u8;
        let ms = timestamp & 0x07FF_FFFF;

        if day > 6 {
            return Err(TimeError::IllegalGlonassDay { day });
        }
        if ms >= MS_PER_DAY {
            return Err(TimeError::GlonassMillisecondsOutOfRange { milliseconds: ms });
        }

        if day < self.last_glonass_day {
            self.start_of_glonass_week += Duration::days(7);
        }
        self.last_glonass_day = day;

        Ok(self.start_of_glonass_week + Duration::days(i64::from(day)) + Duration::milliseconds(i64::from(ms)))
    }

    pub fn start_of_gps_week(&self) -> DateTime<Utc> {
        self.start_of_gps_week
    }

    pub fn start_of_galileo_week(&self) -> DateTime<Utc> {
        self.start_of_galileo_week
    }

    pub fn start_of_glonass_week(&self) -> DateTime<Utc> {
        self.start_of_glonass_week
    }
}

fn ms_since(start_of_week: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    (now - start_of_week).num_milliseconds().max(0) as u32
}

fn most_recent_sunday_midnight(t: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_sunday = i64::from(t.weekday().num_days_from_sunday());
    let midnight = Utc
        .from_utc_datetime(&t.date_naive().and_hms_opt(0, 0, 0).expect("midnight is a valid time"));
    midnight - Duration::days(days_since_sunday)
}

/// GPS/BeiDou week start: the most recent (Sunday midnight UTC − leap
/// seconds) at or before `t`. Computed by finding the current week's
/// candidate and the following week's candidate and picking whichever is
/// valid (≤ t) and latest — equivalent to, but unambiguous about, the
/// "shift across the Saturday/Sunday leap-second boundary" case where the
/// new week has already started a few seconds before the calendar Sunday.
fn leap_adjusted_week_start(t: DateTime<Utc>, leap_seconds: i64) -> DateTime<Utc> {
    let this_week_sunday = most_recent_sunday_midnight(t);
    let next_week_candidate = this_week_sunday + Duration::days(7) - Duration::seconds(leap_seconds);
    if next_week_candidate <= t {
        next_week_candidate
    } else {
        this_week_sunday - Duration::seconds(leap_seconds)
    }
}

fn glonass_week_start(t: DateTime<Utc>) -> DateTime<Utc> {
    let moscow_local = t + Duration::hours(GLONASS_UTC_OFFSET_HOURS);
    most_recent_sunday_midnight(moscow_local) - Duration::hours(GLONASS_UTC_OFFSET_HOURS)
}

fn moscow_weekday(t: DateTime<Utc>) -> u8 {
    let moscow_local = t + Duration::hours(GLONASS_UTC_OFFSET_HOURS);
    moscow_local.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn s4_gps_week_start_on_sunday_shortly_after_rollover() {
        let t = dt(2020, 8, 2, 5, 0, 0);
        let resolver = TimestampResolver::new(t);
        assert_eq!(resolver.start_of_gps_week(), dt(2020, 8, 1, 23, 59, 42));
    }

    #[test]
    fn gps_week_start_edge_case_near_saturday_sunday_boundary() {
        // 10s before the calendar Sunday, but 8s after the leap-adjusted
        // week boundary (Saturday 23:59:42) -- already the new week.
        let t = dt(2020, 8, 8, 23, 59, 50);
        let resolver = TimestampResolver::new(t);
        assert_eq!(resolver.start_of_gps_week(), dt(2020, 8, 8, 23, 59, 42));
    }

    #[test]
    fn gps_timestamps_advance_within_a_week() {
        let mut resolver = TimestampResolver::new(dt(2020, 8, 2, 5, 0, 0));
        let a = resolver.resolve_gps(1_000).unwrap();
        let b = resolver.resolve_gps(2_000).unwrap();
        assert!(b > a);
        assert_eq!((b - a).num_milliseconds(), 1_000);
    }

    #[test]
    fn gps_rollover_advances_exactly_one_week() {
        let mut resolver = TimestampResolver::new(dt(2020, 8, 2, 5, 0, 0));
        let before_rollover = resolver.resolve_gps(604_799_000).unwrap();
        let after_rollover = resolver.resolve_gps(1_000).unwrap();
        let delta = after_rollover - before_rollover;
        assert_eq!(delta.num_milliseconds(), 2_000);
    }

    #[test]
    fn gps_timestamp_over_max_is_an_error() {
        let mut resolver = TimestampResolver::new(dt(2020, 8, 2, 5, 0, 0));
        assert_eq!(
            resolver.resolve_gps(604_800_000),
            Err(TimeError::TimestampOutOfRange { timestamp: 604_800_000 })
        );
    }

    #[test]
    fn glonass_illegal_day_is_rejected() {
        let mut resolver = TimestampResolver::new(dt(2020, 8, 10, 23, 0, 0));
        assert_eq!(resolver.resolve_glonass(7 << 27), Err(TimeError::IllegalGlonassDay { day: 7 }));
    }

    #[test]
    fn glonass_day_rollover_advances_a_week() {
        let mut resolver = TimestampResolver::new(dt(2020, 8, 10, 23, 0, 0));
        let start = resolver.start_of_glonass_week();

        let first = resolver.resolve_glonass((5u32 << 27) | 1_000).unwrap();
        assert_eq!(first, start + Duration::days(5) + Duration::milliseconds(1_000));

        // Day decreases (5 -> 1): a week boundary is crossed.
        let second = resolver.resolve_glonass((1u32 << 27) | 500).unwrap();
        assert_eq!(second, start + Duration::days(7 + 1) + Duration::milliseconds(500));
    }
}
