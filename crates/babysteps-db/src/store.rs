//! [`EventStore`] backed by SQLite, with in-process change notification.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use babysteps_core::{Baby, BabyId, EventStore, Log, Publisher, StoreError, Subscription, UserId};

use crate::{Database, DbError};

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Invalid(e) => Self::Invalid(e),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// SQLite-backed store that pushes fresh snapshots after every write.
#[derive(Debug)]
pub struct SqliteStore {
    db: Mutex<Database>,
    baby_feed: Publisher<UserId, Vec<Baby>>,
    log_feed: Publisher<BabyId, Vec<Log>>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            baby_feed: Publisher::new(),
            log_feed: Publisher::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self, DbError> {
        Database::open(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Database::open_in_memory().map(Self::new)
    }

    fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventStore for SqliteStore {
    fn save_baby(&self, baby: &Baby, user_id: &UserId) -> Result<(), StoreError> {
        let snapshot = {
            let db = self.db();
            db.upsert_baby(baby, user_id)?;
            db.list_babies(user_id)?
        };
        tracing::debug!(baby = %baby.id, user = %user_id, "saved baby");
        self.baby_feed.publish(user_id, &snapshot);
        Ok(())
    }

    fn delete_baby(&self, baby_id: &BabyId) -> Result<(), StoreError> {
        let (owner, snapshot) = {
            let db = self.db();
            let owner = db.baby_owner(baby_id)?.ok_or_else(|| StoreError::NotFound {
                kind: "baby",
                id: baby_id.to_string(),
            })?;
            db.delete_baby(baby_id)?;
            let snapshot = db.list_babies(&owner)?;
            (owner, snapshot)
        };
        tracing::debug!(baby = %baby_id, "deleted baby");
        self.baby_feed.publish(&owner, &snapshot);
        self.log_feed.publish(baby_id, &Vec::new());
        Ok(())
    }

    fn save_log(&self, log: &Log) -> Result<(), StoreError> {
        let snapshot = {
            let db = self.db();
            if db.baby_owner(&log.baby_id)?.is_none() {
                return Err(StoreError::NotFound {
                    kind: "baby",
                    id: log.baby_id.to_string(),
                });
            }
            db.upsert_log(log)?;
            db.list_logs(&log.baby_id)?
        };
        tracing::debug!(log = %log.id, baby = %log.baby_id, kind = %log.log_type(), "saved log");
        self.log_feed.publish(&log.baby_id, &snapshot);
        Ok(())
    }

    fn subscribe_babies(&self, user_id: &UserId) -> Result<Subscription<Vec<Baby>>, StoreError> {
        let db = self.db();
        let initial = db.list_babies(user_id)?;
        Ok(self.baby_feed.subscribe(user_id.clone(), initial))
    }

    fn subscribe_logs(&self, baby_id: &BabyId) -> Result<Subscription<Vec<Log>>, StoreError> {
        let db = self.db();
        let initial = db.list_logs(baby_id)?;
        Ok(self.log_feed.subscribe(baby_id.clone(), initial))
    }
}

#[cfg(test)]
mod tests {
    use babysteps_core::{
        AppController, AppState, Gender, Locale, LogDetails, ManualEntry, ManualKind, User,
    };
    use chrono::{DateTime, NaiveDate, Utc};

    use super::*;

    fn parent() -> User {
        User {
            id: UserId::new("user-1").unwrap(),
            name: "Parent".to_string(),
            email: String::new(),
            photo_url: None,
        }
    }

    fn baby(name: &str) -> Baby {
        Baby::new(name, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), Gender::Boy).unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2025-03-12T20:00:00Z".parse().unwrap()
    }

    #[test]
    fn subscribers_see_writes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = parent().id;
        let mut babies = store.subscribe_babies(&user).unwrap();
        assert_eq!(babies.try_next(), Some(vec![]));

        let child = baby("Timur");
        store.save_baby(&child, &user).unwrap();
        assert_eq!(babies.try_next(), Some(vec![child.clone()]));

        let mut logs = store.subscribe_logs(&child.id).unwrap();
        assert_eq!(logs.try_next(), Some(vec![]));
        let log = Log::new(
            child.id.clone(),
            now(),
            None,
            LogDetails::Health {
                notes: Some("checkup".to_string()),
            },
        )
        .unwrap();
        store.save_log(&log).unwrap();
        assert_eq!(logs.try_next(), Some(vec![log]));
    }

    #[test]
    fn save_log_for_unknown_baby_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let log = Log::new(
            BabyId::new("ghost").unwrap(),
            now(),
            None,
            LogDetails::Health { notes: None },
        )
        .unwrap();
        assert!(matches!(
            store.save_log(&log),
            Err(StoreError::NotFound { kind: "baby", .. })
        ));
    }

    #[test]
    fn delete_pushes_shrunk_list_and_empty_logs() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = parent().id;
        let keep = baby("Aziza");
        let gone = baby("Timur");
        store.save_baby(&keep, &user).unwrap();
        store.save_baby(&gone, &user).unwrap();

        let mut babies = store.subscribe_babies(&user).unwrap();
        let mut logs = store.subscribe_logs(&gone.id).unwrap();
        babies.latest();
        logs.latest();

        store.delete_baby(&gone.id).unwrap();
        assert_eq!(babies.try_next(), Some(vec![keep]));
        assert_eq!(logs.try_next(), Some(vec![]));
    }

    #[test]
    fn controller_runs_against_sqlite() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut app = AppController::new(store, AppState::new(), Locale::En);
        app.sign_in(parent()).unwrap();
        app.add_baby("Aziza", NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), Gender::Girl)
            .unwrap();

        let entry = ManualEntry {
            kind: ManualKind::Sleep,
            picked_at: now(),
            value: "90".to_string(),
            note: String::new(),
        };
        let log = app.add_manual_entry(&entry, now()).unwrap();
        assert_eq!(log.end_time, Some(now()));
        assert_eq!(app.state().logs(), &[log]);
    }
}
