//! Home view helpers: latest activity, age and relative times.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::locale::Locale;
use crate::model::{Log, LogType};
use crate::types::BabyId;

/// Most recent log of `log_type` for `baby_id`, by start time.
pub fn last_log<'a>(logs: &'a [Log], baby_id: &BabyId, log_type: LogType) -> Option<&'a Log> {
    logs.iter()
        .filter(|log| &log.baby_id == baby_id && log.log_type() == log_type)
        .max_by_key(|log| log.start_time)
}

/// Instant to show for a log on the home cards.
///
/// Normally the end time; the start time when the end lies in the future.
#[must_use]
pub fn display_time(log: &Log, now: DateTime<Utc>) -> DateTime<Utc> {
    match log.end_time {
        Some(end) if end > now => log.start_time,
        Some(end) => end,
        None => log.start_time,
    }
}

/// Whole months from `dob` to `today`, never negative.
#[must_use]
pub fn age_in_months(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut months = i64::from(today.year() - dob.year()) * 12 + i64::from(today.month())
        - i64::from(dob.month());
    if today.day() < dob.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

/// Age label: newborn, months, or years and months.
#[must_use]
pub fn describe_age(dob: NaiveDate, today: NaiveDate, locale: Locale) -> String {
    let months = age_in_months(dob, today);
    match months {
        0 => locale.age_newborn().to_string(),
        1..12 => locale.age_months(months),
        _ => locale.age_years(months / 12, months % 12),
    }
}

/// Relative time such as "5 min ago". Future instants read as "just now".
#[must_use]
pub fn time_ago(instant: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let elapsed = now.signed_duration_since(instant);
    if elapsed < chrono::Duration::minutes(1) {
        return locale.just_now().to_string();
    }
    if elapsed < chrono::Duration::hours(1) {
        return locale.minutes_ago(elapsed.num_minutes());
    }
    if elapsed < chrono::Duration::days(1) {
        return locale.hours_ago(elapsed.num_hours());
    }
    locale.days_ago(elapsed.num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::LogDetails;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(baby: &BabyId, start: &str, end: Option<&str>, details: LogDetails) -> Log {
        Log::new(baby.clone(), at(start), end.map(at), details).unwrap()
    }

    #[test]
    fn last_log_picks_latest_start_of_type() {
        let baby = BabyId::new("b").unwrap();
        let other = BabyId::new("o").unwrap();
        let logs = vec![
            log(&baby, "2025-03-12T08:00:00Z", None, LogDetails::Health { notes: None }),
            log(&baby, "2025-03-12T09:00:00Z", Some("2025-03-12T10:00:00Z"), LogDetails::Sleep { notes: None }),
            log(&baby, "2025-03-12T06:00:00Z", Some("2025-03-12T07:00:00Z"), LogDetails::Sleep { notes: None }),
            log(&other, "2025-03-12T11:00:00Z", Some("2025-03-12T12:00:00Z"), LogDetails::Sleep { notes: None }),
        ];
        let last = last_log(&logs, &baby, LogType::Sleep).unwrap();
        assert_eq!(last.start_time, at("2025-03-12T09:00:00Z"));
        assert!(last_log(&logs, &baby, LogType::Feeding).is_none());
    }

    #[test]
    fn display_time_prefers_past_end() {
        let baby = BabyId::new("b").unwrap();
        let now = at("2025-03-12T12:00:00Z");
        let done = log(&baby, "2025-03-12T09:00:00Z", Some("2025-03-12T10:00:00Z"), LogDetails::Sleep { notes: None });
        assert_eq!(display_time(&done, now), at("2025-03-12T10:00:00Z"));

        let ongoing = log(&baby, "2025-03-12T11:00:00Z", Some("2025-03-12T13:00:00Z"), LogDetails::Sleep { notes: None });
        assert_eq!(display_time(&ongoing, now), at("2025-03-12T11:00:00Z"));
    }

    #[test]
    fn age_labels() {
        let dob = date(2024, 9, 15);
        assert_eq!(describe_age(dob, date(2024, 10, 14), Locale::Uz), "Yangi tug'ilgan");
        assert_eq!(describe_age(dob, date(2024, 10, 15), Locale::Uz), "1 oylik");
        assert_eq!(describe_age(dob, date(2025, 9, 15), Locale::Uz), "1 yosh");
        assert_eq!(describe_age(dob, date(2026, 12, 20), Locale::En), "2 years, 3 months");
        assert_eq!(age_in_months(dob, date(2024, 1, 1)), 0);
    }

    #[test]
    fn relative_times() {
        let now = at("2025-03-12T12:00:00Z");
        assert_eq!(time_ago(at("2025-03-12T13:00:00Z"), now, Locale::Uz), "Hozirgina");
        assert_eq!(time_ago(at("2025-03-12T11:55:00Z"), now, Locale::En), "5 min ago");
        assert_eq!(time_ago(at("2025-03-12T09:00:00Z"), now, Locale::Uz), "3 soat oldin");
        assert_eq!(time_ago(at("2025-03-10T11:00:00Z"), now, Locale::En), "2 days ago");
    }
}
