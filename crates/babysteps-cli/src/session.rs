//! One CLI invocation's view of the app: store, restored state and clock.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use babysteps_core::{
    AppController, ControllerError, Locale, User, UserId, snapshot,
};
use babysteps_db::SqliteStore;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

use crate::Config;

/// Wall clock for a command, pinned once so every step sees the same instant.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl Clock {
    /// Current time in the machine's local offset.
    pub fn system() -> Self {
        let local = Local::now();
        Self {
            now: local.with_timezone(&Utc),
            offset: local.offset().fix(),
        }
    }

    pub const fn fixed(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.now.with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }
}

/// Signed-in controller over the on-disk store, saved back to the local
/// snapshot on [`close`](Self::close).
#[derive(Debug)]
pub struct Session {
    pub app: AppController<SqliteStore>,
    snapshot_path: PathBuf,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
        let store = SqliteStore::open(&config.database_path)
            .with_context(|| format!("failed to open {}", config.database_path.display()))?;

        let user = User {
            id: UserId::new(config.user_id.as_str()).context("invalid user_id in config")?,
            name: config.user_name.clone(),
            email: String::new(),
            photo_url: None,
        };

        let mut state = snapshot::load(&config.snapshot_path);
        if state.user().is_some_and(|u| u.id != user.id) {
            tracing::debug!(user = %user.id, "snapshot belongs to another account, discarding");
            state.set_user(None);
        }

        let mut app = AppController::new(store, state, config.locale);
        app.sign_in(user).map_err(|e| localized(&e, config.locale))?;
        Ok(Self {
            app,
            snapshot_path: config.snapshot_path.clone(),
        })
    }

    pub const fn locale(&self) -> Locale {
        self.app.locale()
    }

    /// Persists the local snapshot.
    pub fn close(self) -> Result<()> {
        snapshot::save(&self.snapshot_path, self.app.state())
            .with_context(|| format!("failed to save {}", self.snapshot_path.display()))
    }
}

/// Converts a controller failure into the message the parent sees.
pub fn localized(err: &ControllerError, locale: Locale) -> anyhow::Error {
    anyhow!(err.message(locale))
}


#[cfg(test)]
mod tests {
    use babysteps_core::Gender;

    use super::testing::{clock, config};
    use super::*;

    #[test]
    fn session_restores_active_child_from_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let dob = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();

        let mut session = Session::open(&config).unwrap();
        session.app.add_baby("Aziza", dob, Gender::Girl).unwrap();
        let timur = session.app.add_baby("Timur", dob, Gender::Boy).unwrap();
        session.close().unwrap();

        let session = Session::open(&config).unwrap();
        assert_eq!(session.app.state().active_baby_id(), Some(&timur.id));
        assert_eq!(session.app.state().babies().len(), 2);
    }

    #[test]
    fn snapshot_from_other_account_is_discarded() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = config(temp.path());
        let dob = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();

        let mut session = Session::open(&config).unwrap();
        session.app.add_baby("Aziza", dob, Gender::Girl).unwrap();
        session.close().unwrap();

        config.user_id = "someone-else".to_string();
        let session = Session::open(&config).unwrap();
        assert!(session.app.state().babies().is_empty());
        assert_eq!(session.app.state().active_baby_id(), None);
    }

    #[test]
    fn clock_today_uses_offset() {
        let clock = clock();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        let late = Clock::fixed(
            "2025-03-12T20:30:00Z".parse().unwrap(),
            FixedOffset::east_opt(5 * 3600).unwrap(),
        );
        assert_eq!(late.today(), NaiveDate::from_ymd_opt(2025, 3, 13).unwrap());
    }
}
