//! Storage layer for the baby-care tracker.
//!
//! Provides persistence for children and their logs using `rusqlite`, plus
//! [`SqliteStore`], which adds push notifications on top and implements the
//! core [`EventStore`](babysteps_core::EventStore) trait.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! [`SqliteStore`] serializes access with a `Mutex<Database>`.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Instants are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2025-03-12T08:00:00.000Z`), so lexicographic ordering matches
//! chronological ordering. Dates of birth are stored as `YYYY-MM-DD`.
//!
//! ## Log Details Storage
//!
//! The `details` column stores the JSON-encoded [`LogDetails`] tagged union and
//! the `type` column repeats its tag for indexing. A row whose tag and payload
//! disagree is rejected on read.

mod store;

use std::path::Path;

use babysteps_core::{Baby, BabyId, Gender, Log, LogDetails, LogId, LogType, UserId, ValidationError};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

pub use store::SqliteStore;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp or date.
    #[error("invalid timestamp for {id}: {value}")]
    TimestampParse { id: String, value: String },
    /// Stored row could not be turned back into a domain value.
    #[error("invalid stored data for {id}: {message}")]
    InvalidData { id: String, message: String },
    /// The value being written breaks a model invariant.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS babies (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                dob TEXT NOT NULL,
                weight_kg REAL,
                height_cm REAL,
                photo_url TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_babies_user ON babies(user_id);

            -- start_time/end_time: RFC 3339 UTC (e.g., '2025-03-12T08:00:00.000Z')
            -- type: log type tag (e.g., 'sleep')
            -- details: JSON payload tagged by type
            CREATE TABLE IF NOT EXISTS logs (
                id TEXT PRIMARY KEY,
                baby_id TEXT NOT NULL,
                type TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                details TEXT NOT NULL,
                FOREIGN KEY (baby_id) REFERENCES babies(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_logs_baby_start ON logs(baby_id, start_time);
            CREATE INDEX IF NOT EXISTS idx_logs_type ON logs(type);
            ",
        )?;
        Ok(())
    }

    /// Inserts or updates a child owned by `user_id`.
    pub fn upsert_baby(&self, baby: &Baby, user_id: &UserId) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO babies
            (id, user_id, name, gender, dob, weight_kg, height_cm, photo_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                name = excluded.name,
                gender = excluded.gender,
                dob = excluded.dob,
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                photo_url = excluded.photo_url
            ",
            params![
                baby.id.as_str(),
                user_id.as_str(),
                baby.name,
                baby.gender.as_str(),
                baby.dob.to_string(),
                baby.weight_kg,
                baby.height_cm,
                baby.photo_url,
                format_timestamp(Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Deletes a child and, through the foreign key, all of its logs.
    ///
    /// Returns `false` if no such child existed.
    pub fn delete_baby(&self, baby_id: &BabyId) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM babies WHERE id = ?", [baby_id.as_str()])?;
        Ok(deleted > 0)
    }

    /// Owner of a child, if the child exists.
    pub fn baby_owner(&self, baby_id: &BabyId) -> Result<Option<UserId>, DbError> {
        let owner: Option<String> = self
            .conn
            .query_row(
                "SELECT user_id FROM babies WHERE id = ?",
                [baby_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        owner.map(UserId::new).transpose().map_err(DbError::from)
    }

    /// Lists the children of `user_id` in the order they were added.
    pub fn list_babies(&self, user_id: &UserId) -> Result<Vec<Baby>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, name, gender, dob, weight_kg, height_cm, photo_url
            FROM babies
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            ",
        )?;
        let rows = stmt.query_map([user_id.as_str()], |row| {
            Ok(BabyRow {
                id: row.get(0)?,
                name: row.get(1)?,
                gender: row.get(2)?,
                dob: row.get(3)?,
                weight_kg: row.get(4)?,
                height_cm: row.get(5)?,
                photo_url: row.get(6)?,
            })
        })?;
        let mut babies = Vec::new();
        for row in rows {
            babies.push(row?.into_baby()?);
        }
        Ok(babies)
    }

    /// Inserts a log, replacing any existing row with the same ID.
    pub fn upsert_log(&self, log: &Log) -> Result<(), DbError> {
        log.validate()?;
        let details = serde_json::to_string(&log.details).map_err(|e| DbError::InvalidData {
            id: log.id.to_string(),
            message: e.to_string(),
        })?;
        self.conn.execute(
            "
            INSERT OR REPLACE INTO logs (id, baby_id, type, start_time, end_time, details)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
            params![
                log.id.as_str(),
                log.baby_id.as_str(),
                log.log_type().as_str(),
                format_timestamp(log.start_time),
                log.end_time.map(format_timestamp),
                details,
            ],
        )?;
        Ok(())
    }

    /// Lists the logs of a child, newest first.
    pub fn list_logs(&self, baby_id: &BabyId) -> Result<Vec<Log>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, baby_id, type, start_time, end_time, details
            FROM logs
            WHERE baby_id = ?
            ORDER BY start_time DESC, id ASC
            ",
        )?;
        let rows = stmt.query_map([baby_id.as_str()], |row| {
            Ok(LogRow {
                id: row.get(0)?,
                baby_id: row.get(1)?,
                kind: row.get(2)?,
                start_time: row.get(3)?,
                end_time: row.get(4)?,
                details: row.get(5)?,
            })
        })?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.into_log()?);
        }
        Ok(logs)
    }
}

struct BabyRow {
    id: String,
    name: String,
    gender: String,
    dob: String,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    photo_url: Option<String>,
}

impl BabyRow {
    fn into_baby(self) -> Result<Baby, DbError> {
        let gender: Gender = self.gender.parse()?;
        let dob = NaiveDate::parse_from_str(&self.dob, "%Y-%m-%d").map_err(|_| {
            DbError::TimestampParse {
                id: self.id.clone(),
                value: self.dob.clone(),
            }
        })?;
        Ok(Baby {
            id: BabyId::new(self.id)?,
            name: self.name,
            gender,
            dob,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            photo_url: self.photo_url,
        })
    }
}

struct LogRow {
    id: String,
    baby_id: String,
    kind: String,
    start_time: String,
    end_time: Option<String>,
    details: String,
}

impl LogRow {
    fn into_log(self) -> Result<Log, DbError> {
        let kind: LogType = self.kind.parse()?;
        let details: LogDetails =
            serde_json::from_str(&self.details).map_err(|e| DbError::InvalidData {
                id: self.id.clone(),
                message: e.to_string(),
            })?;
        if details.log_type() != kind {
            return Err(DbError::InvalidData {
                id: self.id,
                message: format!("type column is {kind} but details are {}", details.log_type()),
            });
        }
        let start_time = parse_timestamp(&self.start_time, &self.id)?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|end| parse_timestamp(end, &self.id))
            .transpose()?;
        Ok(Log {
            id: LogId::new(self.id)?,
            baby_id: BabyId::new(self.baby_id)?,
            start_time,
            end_time,
            details,
        })
    }
}

fn parse_timestamp(timestamp: &str, id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| DbError::TimestampParse {
            id: id.to_string(),
            value: timestamp.to_string(),
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
