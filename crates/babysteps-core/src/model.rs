//! Care records: children, logged events and the signed-in account.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BabyId, LogId, UserId, ValidationError};

/// Implements `as_str`, `Display` and `FromStr` for a snake_case enum.
macro_rules! string_enum {
    ($name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// String representation for storage and display.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ValidationError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Gender recorded for a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Boy,
    Girl,
    Other,
}

string_enum!(Gender, "gender" {
    Boy => "boy",
    Girl => "girl",
    Other => "other",
});

/// The kind of care event a log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Feeding,
    Sleep,
    Diaper,
    Growth,
    Health,
}

string_enum!(LogType, "log type" {
    Feeding => "feeding",
    Sleep => "sleep",
    Diaper => "diaper",
    Growth => "growth",
    Health => "health",
});

/// Feeding sub-category.
///
/// The first four are the classic feeding methods; the rest are the food
/// categories offered by the manual entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingKind {
    BreastLeft,
    BreastRight,
    Bottle,
    Solid,
    Water,
    Porridge,
    Fruit,
    Other,
}

string_enum!(FeedingKind, "feeding kind" {
    BreastLeft => "breast_left",
    BreastRight => "breast_right",
    Bottle => "bottle",
    Solid => "solid",
    Water => "water",
    Porridge => "porridge",
    Fruit => "fruit",
    Other => "other",
});

/// Diaper sub-category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperKind {
    Wet,
    Dirty,
    Mixed,
}

string_enum!(DiaperKind, "diaper kind" {
    Wet => "wet",
    Dirty => "dirty",
    Mixed => "mixed",
});

/// A child profile owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub id: BabyId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub dob: NaiveDate,
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Height in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Baby {
    /// Creates a child profile with a fresh ID.
    pub fn new(
        name: impl Into<String>,
        dob: NaiveDate,
        gender: Gender,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self {
            id: BabyId::generate(),
            name,
            gender,
            dob,
            weight_kg: None,
            height_cm: None,
            photo_url: None,
        })
    }
}

/// Payload of a log, keyed by the log type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogDetails {
    Feeding {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<FeedingKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount_ml: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Sleep {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Diaper {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<DiaperKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Growth {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight_kg: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height_cm: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Health {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl LogDetails {
    #[must_use]
    pub const fn log_type(&self) -> LogType {
        match self {
            Self::Feeding { .. } => LogType::Feeding,
            Self::Sleep { .. } => LogType::Sleep,
            Self::Diaper { .. } => LogType::Diaper,
            Self::Growth { .. } => LogType::Growth,
            Self::Health { .. } => LogType::Health,
        }
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        match self {
            Self::Feeding { notes, .. }
            | Self::Sleep { notes }
            | Self::Diaper { notes, .. }
            | Self::Growth { notes, .. }
            | Self::Health { notes } => notes.as_deref(),
        }
    }
}

/// One recorded care event for a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: LogId,
    pub baby_id: BabyId,
    pub start_time: DateTime<Utc>,
    /// Required for duration-bearing logs such as sleep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub details: LogDetails,
}

impl Log {
    /// Creates a log with a fresh ID.
    pub fn new(
        baby_id: BabyId,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        details: LogDetails,
    ) -> Result<Self, ValidationError> {
        let log = Self {
            id: LogId::generate(),
            baby_id,
            start_time,
            end_time,
            details,
        };
        log.validate()?;
        Ok(log)
    }

    #[must_use]
    pub const fn log_type(&self) -> LogType {
        self.details.log_type()
    }

    /// Checks that the log does not end before it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.end_time {
            Some(end) if end < self.start_time => Err(ValidationError::EndBeforeStart {
                log_id: self.id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Whole minutes between start and end, truncated toward zero.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time
            .map(|end| end.signed_duration_since(self.start_time).num_minutes())
    }
}

/// The signed-in parent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

string_enum!(Theme, "theme" {
    Light => "light",
    Dark => "dark",
});

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn log_type_follows_details_variant() {
        let log = Log::new(
            BabyId::new("baby-1").unwrap(),
            ts("2025-03-01T10:00:00Z"),
            None,
            LogDetails::Diaper {
                kind: Some(DiaperKind::Wet),
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(log.log_type(), LogType::Diaper);
    }

    #[test]
    fn log_rejects_end_before_start() {
        let err = Log::new(
            BabyId::new("baby-1").unwrap(),
            ts("2025-03-01T10:00:00Z"),
            Some(ts("2025-03-01T09:00:00Z")),
            LogDetails::Sleep { notes: None },
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    }

    #[test]
    fn duration_minutes_truncates() {
        let log = Log::new(
            BabyId::new("baby-1").unwrap(),
            ts("2025-03-01T10:00:00Z"),
            Some(ts("2025-03-01T10:01:59Z")),
            LogDetails::Sleep { notes: None },
        )
        .unwrap();
        assert_eq!(log.duration_minutes(), Some(1));
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let details = LogDetails::Feeding {
            kind: Some(FeedingKind::Porridge),
            amount_ml: None,
            notes: Some("Kasha yedi.".to_string()),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["type"], "feeding");
        assert_eq!(json["kind"], "porridge");
        assert!(json.get("amount_ml").is_none());
    }

    #[test]
    fn details_reject_fields_of_the_wrong_shape() {
        let parsed: Result<LogDetails, _> =
            serde_json::from_str(r#"{"type":"diaper","kind":"porridge"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn string_enums_parse_their_display_form() {
        for kind in [
            FeedingKind::BreastLeft,
            FeedingKind::Bottle,
            FeedingKind::Water,
            FeedingKind::Other,
        ] {
            assert_eq!(kind.to_string().parse::<FeedingKind>().unwrap(), kind);
        }
        assert_eq!("girl".parse::<Gender>().unwrap(), Gender::Girl);
        assert!("cat".parse::<LogType>().is_err());
    }

    #[test]
    fn baby_requires_a_name() {
        let dob = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(Baby::new("  ", dob, Gender::Boy).is_err());
        let baby = Baby::new(" Ali ", dob, Gender::Boy).unwrap();
        assert_eq!(baby.name, "Ali");
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
