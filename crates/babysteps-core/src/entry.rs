//! Manual entry form resolution.
//!
//! Turns the raw values of the "add a record" form into a well-formed [`Log`].
//! Sleep entries apply the smart-backward rule: if the picked time plus the
//! duration lands in the future, the picked time is read as the wake-up time.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::locale::Locale;
use crate::model::{FeedingKind, Log, LogDetails};
use crate::types::{BabyId, LogId};

/// Nominal duration recorded for a manually entered feeding.
pub const FEEDING_NOMINAL_MINUTES: i64 = 15;

/// Clock and input skew absorbed before a sleep end counts as "in the future".
pub const FUTURE_TOLERANCE: chrono::Duration = chrono::Duration::seconds(60);

/// Food categories offered by the form.
pub const FOOD_CATEGORIES: [FeedingKind; 4] = [
    FeedingKind::Water,
    FeedingKind::Porridge,
    FeedingKind::Fruit,
    FeedingKind::Other,
];

/// Which form tab the entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualKind {
    Feeding,
    Sleep,
}

/// Raw form values.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub kind: ManualKind,
    pub picked_at: DateTime<Utc>,
    /// Food category for feedings, duration in minutes for sleep.
    pub value: String,
    pub note: String,
}

/// Validation failures, reported before anything is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("no child selected")]
    NoActiveBaby,
    #[error("food category is required")]
    MissingFood,
    #[error("unknown food category: {0}")]
    UnknownFood(String),
    #[error("sleep duration must be a positive whole number of minutes, got {0:?}")]
    InvalidDuration(String),
}

impl EntryError {
    /// Message shown to the parent.
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::NoActiveBaby => locale.no_active_baby().to_string(),
            Self::MissingFood | Self::UnknownFood(_) => locale.missing_food().to_string(),
            Self::InvalidDuration(_) => locale.missing_sleep_minutes().to_string(),
        }
    }
}

/// Resolves a form submission into a log for `active_baby`.
pub fn resolve_manual_entry(
    entry: &ManualEntry,
    active_baby: Option<&BabyId>,
    now: DateTime<Utc>,
    locale: Locale,
) -> Result<Log, EntryError> {
    let baby_id = active_baby.ok_or(EntryError::NoActiveBaby)?;
    let note = entry.note.trim();

    let (start_time, end_time, details) = match entry.kind {
        ManualKind::Feeding => {
            let food = parse_food(&entry.value)?;
            let start = entry.picked_at;
            let end = start + chrono::Duration::minutes(FEEDING_NOMINAL_MINUTES);
            let notes = join_note(&locale.feeding_note(food), note);
            let details = LogDetails::Feeding {
                kind: Some(food),
                amount_ml: None,
                notes: Some(notes),
            };
            (start, end, details)
        }
        ManualKind::Sleep => {
            let minutes = parse_minutes(&entry.value)?;
            let (start, end) = resolve_sleep_window(entry.picked_at, minutes, now);
            let notes = join_note(&locale.manual_sleep_note(minutes), note);
            (start, end, LogDetails::Sleep { notes: Some(notes) })
        }
    };

    Ok(Log {
        id: LogId::generate(),
        baby_id: baby_id.clone(),
        start_time,
        end_time: Some(end_time),
        details,
    })
}

/// Start and end of a sleep of `minutes` picked at `picked_at`.
///
/// Forward by default; backward when the forward end would pass
/// `now + FUTURE_TOLERANCE`.
#[must_use]
pub fn resolve_sleep_window(
    picked_at: DateTime<Utc>,
    minutes: i64,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let duration = chrono::Duration::minutes(minutes);
    let naive_end = picked_at + duration;
    if naive_end > now + FUTURE_TOLERANCE {
        (picked_at - duration, picked_at)
    } else {
        (picked_at, naive_end)
    }
}

fn parse_food(value: &str) -> Result<FeedingKind, EntryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EntryError::MissingFood);
    }
    value
        .parse::<FeedingKind>()
        .ok()
        .filter(|kind| FOOD_CATEGORIES.contains(kind))
        .ok_or_else(|| EntryError::UnknownFood(value.to_string()))
}

fn parse_minutes(value: &str) -> Result<i64, EntryError> {
    match value.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(EntryError::InvalidDuration(value.to_string())),
    }
}

fn join_note(prefix: &str, note: &str) -> String {
    format!("{prefix} {note}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::LogType;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn now() -> DateTime<Utc> {
        at("2025-03-12T20:00:00Z")
    }

    fn baby() -> BabyId {
        BabyId::new("baby-1").unwrap()
    }

    fn sleep_entry(picked_at: DateTime<Utc>, minutes: &str) -> ManualEntry {
        ManualEntry {
            kind: ManualKind::Sleep,
            picked_at,
            value: minutes.to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn sleep_picked_now_is_read_backward() {
        let log = resolve_manual_entry(&sleep_entry(now(), "60"), Some(&baby()), now(), Locale::Uz)
            .unwrap();
        assert_eq!(log.log_type(), LogType::Sleep);
        assert_eq!(log.end_time, Some(now()));
        assert_eq!(log.start_time, now() - chrono::Duration::minutes(60));
        assert_eq!(
            log.details.notes(),
            Some("1 soat 0 daqiqa uxladi (qo'lda).")
        );
    }

    #[test]
    fn sleep_in_the_past_is_read_forward() {
        let picked = at("2025-03-12T13:00:00Z");
        let log = resolve_manual_entry(&sleep_entry(picked, "90"), Some(&baby()), now(), Locale::Uz)
            .unwrap();
        assert_eq!(log.start_time, picked);
        assert_eq!(log.end_time, Some(at("2025-03-12T14:30:00Z")));
    }

    #[test]
    fn one_minute_tolerance_keeps_forward_reading() {
        // naive end lands exactly at now + 1 minute
        let picked = now() - chrono::Duration::minutes(29);
        let (start, end) = resolve_sleep_window(picked, 30, now());
        assert_eq!(start, picked);
        assert_eq!(end, now() + chrono::Duration::minutes(1));

        let picked = now() - chrono::Duration::minutes(28);
        let (start, end) = resolve_sleep_window(picked, 30, now());
        assert_eq!(end, picked);
        assert_eq!(start, picked - chrono::Duration::minutes(30));
    }

    #[test]
    fn resolved_sleep_never_ends_before_it_starts() {
        for offset in [-600, -61, -1, 0, 1, 30, 600] {
            let picked = now() + chrono::Duration::minutes(offset);
            let log = resolve_manual_entry(
                &sleep_entry(picked, "45"),
                Some(&baby()),
                now(),
                Locale::En,
            )
            .unwrap();
            assert!(log.validate().is_ok(), "offset {offset}");
        }
    }

    #[test]
    fn sleep_requires_positive_minutes() {
        for value in ["", "0", "-5", "abc"] {
            let err = resolve_manual_entry(&sleep_entry(now(), value), Some(&baby()), now(), Locale::Uz)
                .unwrap_err();
            assert!(matches!(err, EntryError::InvalidDuration(_)), "value {value:?}");
        }
    }

    #[test]
    fn feeding_uses_nominal_duration_and_label() {
        let picked = at("2025-03-12T09:00:00Z");
        let entry = ManualEntry {
            kind: ManualKind::Feeding,
            picked_at: picked,
            value: "porridge".to_string(),
            note: " with milk ".to_string(),
        };
        let log = resolve_manual_entry(&entry, Some(&baby()), now(), Locale::Uz).unwrap();
        assert_eq!(log.start_time, picked);
        assert_eq!(log.end_time, Some(at("2025-03-12T09:15:00Z")));
        assert_eq!(
            log.details,
            LogDetails::Feeding {
                kind: Some(FeedingKind::Porridge),
                amount_ml: None,
                notes: Some("Kasha yedi. with milk".to_string()),
            }
        );
    }

    #[test]
    fn feeding_in_the_future_is_not_shifted() {
        let picked = now() + chrono::Duration::hours(2);
        let entry = ManualEntry {
            kind: ManualKind::Feeding,
            picked_at: picked,
            value: "water".to_string(),
            note: String::new(),
        };
        let log = resolve_manual_entry(&entry, Some(&baby()), now(), Locale::En).unwrap();
        assert_eq!(log.start_time, picked);
        assert_eq!(log.details.notes(), Some("Ate water."));
    }

    #[test]
    fn feeding_requires_known_category() {
        let mut entry = ManualEntry {
            kind: ManualKind::Feeding,
            picked_at: now(),
            value: "  ".to_string(),
            note: String::new(),
        };
        assert_eq!(
            resolve_manual_entry(&entry, Some(&baby()), now(), Locale::Uz).unwrap_err(),
            EntryError::MissingFood
        );

        entry.value = "bottle".to_string();
        assert_eq!(
            resolve_manual_entry(&entry, Some(&baby()), now(), Locale::Uz).unwrap_err(),
            EntryError::UnknownFood("bottle".to_string())
        );
    }

    #[test]
    fn entry_requires_active_child() {
        let err = resolve_manual_entry(&sleep_entry(now(), "30"), None, now(), Locale::Uz)
            .unwrap_err();
        assert_eq!(err, EntryError::NoActiveBaby);
        assert_eq!(err.message(Locale::Uz), "Xatolik: Bola tanlanmagan!");
    }
}
