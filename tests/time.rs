//! Integration tests for the timestamp resolver, driven through the
//! dispatcher against full MSM frames.

mod support;

use chrono::{TimeZone, Utc};
use rtcm3::dispatcher::{self, Body};
use rtcm3::time::TimestampResolver;
use support::MsmHeaderFields;

/// Builds a header-only MSM7 frame (no satellites/signals) carrying just a
/// timestamp, for exercising the dispatcher's time resolution path.
fn build_timestamp_only_frame(message_type: u16, timestamp: u32) -> Vec<u8> {
    const HEADER_BITS: usize = 169;
    support::build_frame(HEADER_BITS + 1, |buf| {
        let fields = MsmHeaderFields {
            message_type,
            station_id: 1,
            timestamp,
            multiple_message: false,
            satellite_mask: 0,
            signal_mask: 0,
        };
        let pos = support::write_msm_header(buf, &fields);
        support::set_bits(buf, pos, 1, 0); // 0 satellites x 0 signals: no cell mask bits needed, pad to a byte
    })
}

/// Initialising at 2020-08-02 05:00:00 UTC (Sunday, shortly after GPS week
/// start) and decoding an MSM7 with timestamp 2000ms places `sent_at` 2
/// seconds after `start_of_gps_week`.
#[test]
fn gps_message_resolves_against_week_start() {
    let frame = build_timestamp_only_frame(1077, 2_000);
    let mut resolver = TimestampResolver::new(Utc.with_ymd_and_hms(2020, 8, 2, 5, 0, 0).unwrap());

    let message = dispatcher::dispatch(&frame, &mut resolver);
    assert_eq!(message.timestamp, Some(2_000));
    assert_eq!(message.start_of_week, Some(Utc.with_ymd_and_hms(2020, 8, 1, 23, 59, 42).unwrap()));
    assert_eq!(
        message.sent_at,
        Some(Utc.with_ymd_and_hms(2020, 8, 1, 23, 59, 42).unwrap() + chrono::Duration::milliseconds(2_000))
    );
    assert!(message.error.is_none());
}

/// Across a sequence of non-decreasing GPS timestamps, `sent_at` is
/// strictly increasing and every message lands in the same week.
#[test]
fn gps_timestamps_are_monotonic_within_a_week() {
    let mut resolver = TimestampResolver::new(Utc.with_ymd_and_hms(2020, 8, 2, 5, 0, 0).unwrap());
    let timestamps = [1_000u32, 5_000, 100_000, 500_000];

    let mut last = None;
    for ts in timestamps {
        let frame = build_timestamp_only_frame(1077, ts);
        let message = dispatcher::dispatch(&frame, &mut resolver);
        let sent_at = message.sent_at.expect("GPS timestamp should resolve");
        if let Some(prev) = last {
            assert!(sent_at > prev);
        }
        last = Some(sent_at);
    }
}

/// A GPS timestamp that decreases relative to the previous one crosses
/// exactly one week boundary.
#[test]
fn gps_rollover_crosses_exactly_one_week() {
    let mut resolver = TimestampResolver::new(Utc.with_ymd_and_hms(2020, 8, 2, 5, 0, 0).unwrap());

    let before = dispatcher::dispatch(&build_timestamp_only_frame(1077, 604_799_000), &mut resolver)
        .sent_at
        .unwrap();
    let after = dispatcher::dispatch(&build_timestamp_only_frame(1077, 1_000), &mut resolver)
        .sent_at
        .unwrap();

    assert_eq!((after - before).num_milliseconds(), 2_000);
}

/// A timestamp beyond the 30-bit week-relative range is a Range error: the
/// message is still emitted, with `error` set and no `sent_at`.
#[test]
fn gps_timestamp_out_of_range_is_reported_not_fatal() {
    let frame = build_timestamp_only_frame(1077, 604_800_000);
    let mut resolver = TimestampResolver::new(Utc.with_ymd_and_hms(2020, 8, 2, 5, 0, 0).unwrap());

    let message = dispatcher::dispatch(&frame, &mut resolver);
    assert!(message.sent_at.is_none());
    assert!(message.error.is_some());
    assert_eq!(message.message_type, 1077);
    assert_ne!(message.body, Body::Unknown); // MSM header still decoded; only timing failed
}

/// A GLONASS timestamp (day=1/Monday, ms=4h) with the handler initialised
/// right at a Moscow week start (2020-08-08 21:00 UTC == Sunday 00:00
/// Moscow) resolves to Monday 4am Moscow == 2020-08-10 01:00:00 UTC.
#[test]
fn glonass_message_resolves_through_moscow_offset() {
    let timestamp = (1u32 << 27) | (4 * 3_600_000);
    let frame = build_timestamp_only_frame(1087, timestamp);
    let mut resolver = TimestampResolver::new(Utc.with_ymd_and_hms(2020, 8, 8, 21, 0, 0).unwrap());

    let message = dispatcher::dispatch(&frame, &mut resolver);
    assert_eq!(message.sent_at, Some(Utc.with_ymd_and_hms(2020, 8, 10, 1, 0, 0).unwrap()));
}
