//! Time utilities: parsing HH:MM, epoch-millisecond ↔ local time conversions,
//! day keys, month keys and minute arithmetic.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_DAY: i64 = 86_400_000;
pub const MINUTES_PER_DAY: i64 = 1440;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_time_strict(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        Ok(Some(parse_time_strict(s)?))
    } else {
        Ok(None)
    }
}

/// Epoch milliseconds → local date-time.
pub fn local_from_ms(ms: i64) -> AppResult<DateTime<Local>> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or(AppError::InvalidTimestamp(ms))
}

/// Local naive date-time → epoch milliseconds.
/// A wall time skipped by a DST jump resolves to the first valid instant after it.
pub fn ms_from_local(naive: NaiveDateTime) -> AppResult<i64> {
    if let Some(dt) = naive.and_local_timezone(Local).earliest() {
        return Ok(dt.timestamp_millis());
    }

    (naive + Duration::hours(1))
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| AppError::InvalidTime(naive.to_string()))
}

pub fn local_date(ms: i64) -> AppResult<NaiveDate> {
    Ok(local_from_ms(ms)?.date_naive())
}

/// Local calendar day (`YYYY-MM-DD`) containing `ms`.
pub fn day_key_from(ms: i64) -> AppResult<String> {
    Ok(local_date(ms)?.format("%Y-%m-%d").to_string())
}

/// Year + month (`YYYY-MM`) containing `ms`.
pub fn month_key(ms: i64) -> AppResult<String> {
    Ok(local_from_ms(ms)?.format("%Y-%m").to_string())
}

/// `HH:MM` of `ms` in local time.
pub fn fmt_time(ms: i64) -> String {
    local_from_ms(ms)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| "--:--".to_string())
}

/// Human range of a block: `09:00 – 09:30` or `09:30 → now`.
pub fn fmt_range(start_ts: i64, end_ts: Option<i64>) -> String {
    match end_ts {
        Some(end) => format!("{} – {}", fmt_time(start_ts), fmt_time(end)),
        None => format!("{} → now", fmt_time(start_ts)),
    }
}

/// Timestamp of `time` on the local day that contains `now`.
pub fn today_at(now: i64, time: NaiveTime) -> AppResult<i64> {
    ms_from_local(local_date(now)?.and_time(time))
}

/// Next local occurrence of `time` strictly after `now` (tomorrow if today's has passed).
pub fn next_occurrence(now: i64, time: NaiveTime) -> AppResult<i64> {
    let today = today_at(now, time)?;
    if today > now {
        return Ok(today);
    }

    let tomorrow = local_date(now)?
        .succ_opt()
        .ok_or(AppError::InvalidTimestamp(now))?;
    ms_from_local(tomorrow.and_time(time))
}

/// Whole minutes from `a` to `b`, rounded to the nearest minute, never negative.
/// Used for displayed durations.
pub fn minutes_between(a: i64, b: i64) -> i64 {
    let diff = (b - a).max(0);
    (diff + MS_PER_MINUTE / 2) / MS_PER_MINUTE
}

/// Whole elapsed minutes from `a` to `b`, truncated, never negative.
/// Used for thresholds so that "at least N minutes" means exactly that.
pub fn elapsed_minutes(a: i64, b: i64) -> i64 {
    (b - a).max(0) / MS_PER_MINUTE
}

/// Parse `HH:MM` (today) or `YYYY-MM-DD HH:MM` into epoch milliseconds.
pub fn parse_local_datetime(input: &str, now: i64) -> AppResult<i64> {
    let s = input.trim();
    if let Some(t) = parse_time(s) {
        return today_at(now, t);
    }

    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return ms_from_local(dt);
        }
    }

    Err(AppError::InvalidTime(input.to_string()))
}
