//! Day-by-day history (calendar view).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::model::{Log, LogDetails};
use crate::summary::WEEKLY_POINTS;
use crate::types::BabyId;

/// The trailing week of calendar days ending at `today`, oldest first.
#[must_use]
pub fn history_days(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WEEKLY_POINTS)
        .rev()
        .map(|days_back| today - chrono::Duration::days(days_back))
        .collect()
}

/// Logs of `baby_id` that started on `date` in `tz`, newest first.
pub fn day_logs<'a, Tz: TimeZone>(
    logs: &'a [Log],
    baby_id: &BabyId,
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Log> {
    let mut day: Vec<&Log> = logs
        .iter()
        .filter(|log| &log.baby_id == baby_id)
        .filter(|log| local_date(log.start_time, tz) == date)
        .collect();
    day.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    day
}

/// One-line detail text: sub-type, amount, notes and weight joined by ` • `.
#[must_use]
pub fn describe_details(log: &Log) -> String {
    let mut parts: Vec<String> = Vec::new();
    match &log.details {
        LogDetails::Feeding {
            kind, amount_ml, ..
        } => {
            parts.extend(kind.map(|k| k.as_str().replace('_', " ")));
            parts.extend(amount_ml.map(|ml| format!("{ml}ml")));
        }
        LogDetails::Diaper { kind, .. } => {
            parts.extend(kind.map(|k| k.as_str().to_string()));
        }
        LogDetails::Sleep { .. } | LogDetails::Growth { .. } | LogDetails::Health { .. } => {}
    }
    parts.extend(log.details.notes().map(str::to_string));
    if let LogDetails::Growth {
        weight_kg: Some(kg),
        ..
    } = &log.details
    {
        parts.push(format!("{kg}kg"));
    }
    parts.join(" • ")
}

fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}
