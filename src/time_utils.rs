// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar math.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z`
/// suffix, the same shape JavaScript's `toISOString` produces.
///
/// Activity timestamps are compared as strings, so every cutoff must use
/// this exact layout.
pub fn format_utc_iso(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The instant `days` whole days before `now`.
pub fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

/// Whole days elapsed from `since` to `now`, rounded toward negative
/// infinity. A timestamp in the future yields a negative count.
pub fn whole_days_between(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_milliseconds().div_euclid(86_400_000)
}

/// Midnight at the start of the calendar day containing `now` in `tz`.
///
/// When midnight does not exist locally (a DST gap), the earliest valid
/// instant of that day is used.
pub fn start_of_local_day(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local_date = now.with_timezone(&tz).date_naive();
    let midnight = local_date.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let mut probe = midnight;
            loop {
                probe += Duration::minutes(15);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
        }
    }
}
