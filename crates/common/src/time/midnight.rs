//! Next-local-midnight computation
//!
//! Derived from wall-clock time on every call; there is no stored schedule,
//! so a restarted process lands on the same next run.

use std::time::Duration;

use chrono::{DateTime, Days, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

/// Longest DST gap we search across when midnight itself does not exist.
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// The first 00:00:00 in `now`'s time zone that is strictly after `now`.
///
/// When a DST transition skips midnight the first existing local instant
/// after it is used; when midnight repeats, the earlier one wins.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return now.clone() + TimeDelta::days(1);
    };
    let midnight = tomorrow.and_time(NaiveTime::MIN);

    resolve_local(&tz, &midnight).unwrap_or_else(|| now.clone() + TimeDelta::days(1))
}

/// Time left until [`next_midnight`]. Never zero for a valid clock.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    next_midnight(now).signed_duration_since(now.clone()).to_std().unwrap_or(Duration::ZERO)
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=MAX_GAP_MINUTES)
            .find_map(|minutes| tz.from_local_datetime(&(*naive + TimeDelta::minutes(minutes))).earliest()),
    }
}
