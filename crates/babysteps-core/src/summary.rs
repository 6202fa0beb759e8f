//! Rolling health summary derived from a child's event log.
//!
//! Everything here is pure: the same `(logs, baby, now)` always yields the same
//! [`Summary`]. Calendar days are taken in the time zone of `now`, so callers
//! pass a `DateTime<Local>` (or a fixed offset in tests) rather than UTC.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::locale::Locale;
use crate::model::{Baby, Log, LogType};

/// Lookback from `now` that a log must start within to count toward today.
pub const TRAILING_WINDOW: chrono::Duration = chrono::Duration::seconds(48 * 3600);

/// Sleep totals above this are treated as a data entry mistake.
pub const MAX_PLAUSIBLE_SLEEP_HOURS: f64 = 24.0;

/// Below this many hours of sleep the day is flagged as low.
pub const LOW_SLEEP_HOURS: f64 = 9.0;

/// Number of points in the weekly chart.
pub const WEEKLY_POINTS: i64 = 7;

/// Tri-state health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Average,
    Bad,
}

impl HealthStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Average => "average",
            Self::Bad => "bad",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of the weekly sleep chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySleep {
    pub date: NaiveDate,
    /// Abbreviated weekday name in the display locale.
    pub label: String,
    /// Sleep hours rounded to one decimal.
    pub hours: f64,
}

/// Derived state shown on the home view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub sleep_hours: f64,
    pub feed_count: usize,
    pub status: HealthStatus,
    pub advisory: String,
    pub weekly: Vec<DailySleep>,
}

/// Classifies a day from its sleep total and feed count.
///
/// Rules are evaluated in order: implausible totals first, then "nothing
/// logged yet", then low sleep.
#[must_use]
pub fn classify(sleep_hours: f64, feed_count: usize) -> HealthStatus {
    let nothing_logged = sleep_hours == 0.0 && feed_count == 0;
    if sleep_hours > MAX_PLAUSIBLE_SLEEP_HOURS {
        HealthStatus::Bad
    } else if nothing_logged || sleep_hours < LOW_SLEEP_HOURS {
        HealthStatus::Average
    } else {
        HealthStatus::Good
    }
}

/// Computes the rolling summary for `baby` as of `now`.
pub fn summarize<Tz: TimeZone>(
    logs: &[Log],
    baby: &Baby,
    now: &DateTime<Tz>,
    locale: Locale,
) -> Summary {
    let today = now.date_naive();
    let now_utc = now.with_timezone(&Utc);
    let recent: Vec<&Log> = logs
        .iter()
        .filter(|log| log.baby_id == baby.id)
        .filter(|log| now_utc.signed_duration_since(log.start_time) < TRAILING_WINDOW)
        .collect();

    let sleep_minutes: i64 = recent
        .iter()
        .filter(|log| log.log_type() == LogType::Sleep)
        .filter_map(|log| {
            let end = log.end_time?;
            let starts_today = local_date(now, log.start_time) == today;
            let ends_today = local_date(now, end) == today;
            (starts_today || ends_today).then(|| log.duration_minutes().unwrap_or(0))
        })
        .sum();
    let sleep_hours = minutes_to_hours(sleep_minutes);

    let feed_count = recent
        .iter()
        .filter(|log| log.log_type() == LogType::Feeding)
        .filter(|log| local_date(now, log.start_time) == today)
        .count();

    let status = classify(sleep_hours, feed_count);
    let has_logs = logs.iter().any(|log| log.baby_id == baby.id);
    let advisory = if has_logs {
        advisory(status, sleep_hours, feed_count, &baby.name, locale)
    } else {
        locale.advisory_not_enough_data().to_string()
    };

    Summary {
        sleep_hours,
        feed_count,
        status,
        advisory,
        weekly: weekly_sleep(logs, baby, now, locale),
    }
}

/// Sleep hours per calendar day for the trailing week, oldest first.
///
/// A session counts toward the day it started on.
pub fn weekly_sleep<Tz: TimeZone>(
    logs: &[Log],
    baby: &Baby,
    now: &DateTime<Tz>,
    locale: Locale,
) -> Vec<DailySleep> {
    let today = now.date_naive();
    (0..WEEKLY_POINTS)
        .rev()
        .map(|days_back| {
            let date = today - chrono::Duration::days(days_back);
            let minutes: i64 = logs
                .iter()
                .filter(|log| log.baby_id == baby.id && log.log_type() == LogType::Sleep)
                .filter(|log| local_date(now, log.start_time) == date)
                .filter_map(Log::duration_minutes)
                .sum();
            DailySleep {
                date,
                label: locale.weekday_short(chrono::Datelike::weekday(&date)).to_string(),
                hours: round_one_decimal(minutes_to_hours(minutes)),
            }
        })
        .collect()
}

fn advisory(
    status: HealthStatus,
    sleep_hours: f64,
    feed_count: usize,
    name: &str,
    locale: Locale,
) -> String {
    match status {
        HealthStatus::Bad => locale.advisory_data_error(sleep_hours),
        HealthStatus::Average if sleep_hours == 0.0 && feed_count == 0 => {
            locale.advisory_nothing_today().to_string()
        }
        HealthStatus::Average => locale.advisory_low_sleep(name, sleep_hours),
        HealthStatus::Good => locale.advisory_good(name, sleep_hours),
    }
}

fn local_date<Tz: TimeZone>(now: &DateTime<Tz>, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&now.timezone()).date_naive()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "minute totals are far below 2^52"
)]
fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
