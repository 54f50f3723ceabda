//! Date and time wire encodings.
//!
//! SQL Server has two families of temporal types:
//!
//! - the legacy `DATETIME`: days since 1900-01-01 (`i32`) followed by
//!   1/300-second ticks since midnight (`u32`)
//! - the `DATE`/`TIME`/`DATETIME2`/`DATETIMEOFFSET` family: days since
//!   0001-01-01 in 3 bytes and fractional-second intervals since midnight in
//!   3 to 5 bytes, depending on the scale
//!
//! All integers are little-endian.

use bytes::{BufMut, BytesMut};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use tds_protocol::{time_len, DEFAULT_TIME_SCALE};

use crate::error::TypeError;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Legacy `DATETIME` ticks per second.
pub const DATETIME_TICKS_PER_SECOND: u64 = 300;

/// `num_days_from_ce` of 1900-01-01, the legacy `DATETIME` epoch.
const DATETIME_EPOCH_CE: i32 = 693_596;

/// Days from 0001-01-01 to 9999-12-31, the last representable `DATE`.
const MAX_DATE_DAYS: u32 = 3_652_058;

/// Split a timestamp into whole days since 0001-01-01 and nanoseconds into
/// that day, both taken from the UTC instant.
///
/// Fails for instants outside `0001-01-01..=9999-12-31` UTC.
pub fn day_nanos<Tz: TimeZone>(value: &DateTime<Tz>) -> Result<(u32, u64), TypeError> {
    let utc = value.naive_utc();
    Ok((date_days(utc.date())?, nanos_of_day(utc.time())))
}

fn date_days(date: NaiveDate) -> Result<u32, TypeError> {
    u32::try_from(date.num_days_from_ce() - 1)
        .ok()
        .filter(|days| *days <= MAX_DATE_DAYS)
        .ok_or_else(|| TypeError::OutOfRange {
            target_type: "DATE",
            detail: format!("{date} is outside 0001-01-01..=9999-12-31"),
        })
}

fn nanos_of_day(time: NaiveTime) -> u64 {
    // leap seconds saturate
    u64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND
        + u64::from(time.nanosecond().min(999_999_999))
}

fn put_time(buf: &mut BytesMut, nanos: u64, scale: u8) {
    let divisor = 10u64.pow(9 - u32::from(scale.min(DEFAULT_TIME_SCALE)));
    let intervals = nanos / divisor;
    let len = time_len(scale) as usize;
    buf.put_slice(&intervals.to_le_bytes()[..len]);
}

fn put_days(buf: &mut BytesMut, days: u32) {
    buf.put_slice(&days.to_le_bytes()[..3]);
}

/// Encode a legacy 8-byte `DATETIME`.
///
/// Both the day count and the tick count are read off the wall clock in the
/// value's own offset, so the epoch is 1900-01-01 00:00 in that offset. Days
/// before the epoch are negative while the ticks stay within the day.
pub fn encode_datetime1(value: &DateTime<FixedOffset>, buf: &mut BytesMut) {
    let local = value.naive_local();
    let days = local.date().num_days_from_ce() - DATETIME_EPOCH_CE;
    let ticks = nanos_of_day(local.time()) * DATETIME_TICKS_PER_SECOND / NANOS_PER_SECOND;

    buf.put_i32_le(days);
    // at most 300 * 86_400, always fits
    buf.put_u32_le(ticks as u32);
}

/// Encode a `DATE` (3 bytes).
pub fn encode_date(value: NaiveDate, buf: &mut BytesMut) -> Result<(), TypeError> {
    put_days(buf, date_days(value)?);
    Ok(())
}

/// Encode a `TIME(7)` (5 bytes).
pub fn encode_time(value: NaiveTime, buf: &mut BytesMut) {
    put_time(buf, nanos_of_day(value), DEFAULT_TIME_SCALE);
}

/// Encode a `DATETIME2(7)`: time then date (8 bytes).
pub fn encode_datetime2(value: NaiveDateTime, buf: &mut BytesMut) -> Result<(), TypeError> {
    let days = date_days(value.date())?;
    put_time(buf, nanos_of_day(value.time()), DEFAULT_TIME_SCALE);
    put_days(buf, days);
    Ok(())
}

/// Encode a `DATETIMEOFFSET(7)` (10 bytes).
///
/// Time and date describe the UTC instant; the trailing `i16` is the
/// value's offset from UTC in whole minutes, truncated toward zero.
pub fn encode_datetimeoffset(
    value: &DateTime<FixedOffset>,
    buf: &mut BytesMut,
) -> Result<(), TypeError> {
    let (days, nanos) = day_nanos(value)?;
    put_time(buf, nanos, DEFAULT_TIME_SCALE);
    put_days(buf, days);

    // |offset| < 24h, so the minute count fits an i16
    let minutes = value.offset().local_minus_utc() / 60;
    buf.put_i16_le(minutes as i16);
    Ok(())
}
