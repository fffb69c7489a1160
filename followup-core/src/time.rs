//! Temporal rules: day deltas and trailing windows over an injected `now`.
//!
//! Nothing in this module reads the wall clock. Callers capture one instant per
//! run and thread it through every rule so a whole batch shares a single frame.

use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `a` to `b`, floored. Negative when `b` precedes `a`.
///
/// `days_between(now - 36h, now) == 1`, `days_between(now, now - 36h) == -2`.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (b - a).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// True when `timestamp` falls inside the trailing `window_days` ending at `now`.
///
/// Timestamps after `now` (clock skew between writers) count as inside. A window
/// reaching past the earliest representable instant covers everything.
pub fn is_within_trailing_window(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: i64,
) -> bool {
    match Duration::try_days(window_days).and_then(|w| now.checked_sub_signed(w)) {
        Some(start) => timestamp >= start,
        None => true,
    }
}

/// Wall-clock layouts accepted for a pinned `now`.
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Interpret a wall-clock reading such as "2026-03-10 09:00" in the IANA zone
/// `tz` and return the UTC instant.
///
/// On a DST fall-back the earlier of the two instants is used; a reading that
/// falls in a spring-forward gap is rejected.
pub fn parse_local_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let zone = Tz::from_str(tz).map_err(|_| anyhow!("unknown IANA timezone '{tz}'"))?;

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local.trim(), fmt).ok())
        .ok_or_else(|| anyhow!("expected \"YYYY-MM-DD HH:MM\", got '{local}'"))?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Ok(at.with_timezone(&Utc)),
        LocalResult::None => bail!("'{local}' does not exist in {tz} (DST gap)"),
    }
}
