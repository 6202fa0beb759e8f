//! Event log store boundary.
//!
//! The store is the source of truth for children and logs. Readers subscribe
//! and receive a full snapshot on every change; writers save and rely on the
//! next push to see their own write.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::model::{Baby, Log};
use crate::subscription::{Publisher, Subscription};
use crate::types::{BabyId, UserId, ValidationError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Persistence and change notification for children and their logs.
pub trait EventStore {
    fn save_baby(&self, baby: &Baby, user_id: &UserId) -> Result<(), StoreError>;

    fn delete_baby(&self, baby_id: &BabyId) -> Result<(), StoreError>;

    fn save_log(&self, log: &Log) -> Result<(), StoreError>;

    /// Children owned by `user_id`, pushed on every change.
    fn subscribe_babies(&self, user_id: &UserId) -> Result<Subscription<Vec<Baby>>, StoreError>;

    /// Logs of `baby_id` sorted by start time, newest first, pushed on every
    /// change.
    fn subscribe_logs(&self, baby_id: &BabyId) -> Result<Subscription<Vec<Log>>, StoreError>;
}

/// Orders logs newest first, the order every log snapshot is delivered in.
pub fn sort_newest_first(logs: &mut [Log]) {
    logs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

#[derive(Debug, Default)]
struct MemoryData {
    babies: Vec<(UserId, Baby)>,
    logs: HashMap<BabyId, Vec<Log>>,
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
    baby_feed: Publisher<UserId, Vec<Baby>>,
    log_feed: Publisher<BabyId, Vec<Log>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn babies_of(data: &MemoryData, user_id: &UserId) -> Vec<Baby> {
        data.babies
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, baby)| baby.clone())
            .collect()
    }

    fn logs_of(data: &MemoryData, baby_id: &BabyId) -> Vec<Log> {
        let mut logs = data.logs.get(baby_id).cloned().unwrap_or_default();
        sort_newest_first(&mut logs);
        logs
    }
}

impl EventStore for MemoryStore {
    fn save_baby(&self, baby: &Baby, user_id: &UserId) -> Result<(), StoreError> {
        let snapshot = {
            let mut data = self.data();
            match data.babies.iter_mut().find(|(_, b)| b.id == baby.id) {
                Some(entry) => *entry = (user_id.clone(), baby.clone()),
                None => data.babies.push((user_id.clone(), baby.clone())),
            }
            Self::babies_of(&data, user_id)
        };
        tracing::debug!(baby = %baby.id, "saved baby");
        self.baby_feed.publish(user_id, &snapshot);
        Ok(())
    }

    fn delete_baby(&self, baby_id: &BabyId) -> Result<(), StoreError> {
        let (owner, snapshot) = {
            let mut data = self.data();
            let idx = data
                .babies
                .iter()
                .position(|(_, b)| &b.id == baby_id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "baby",
                    id: baby_id.to_string(),
                })?;
            let (owner, _) = data.babies.remove(idx);
            data.logs.remove(baby_id);
            let snapshot = Self::babies_of(&data, &owner);
            (owner, snapshot)
        };
        tracing::debug!(baby = %baby_id, "deleted baby");
        self.baby_feed.publish(&owner, &snapshot);
        self.log_feed.publish(baby_id, &Vec::new());
        Ok(())
    }

    fn save_log(&self, log: &Log) -> Result<(), StoreError> {
        log.validate()?;
        let snapshot = {
            let mut data = self.data();
            if !data.babies.iter().any(|(_, b)| b.id == log.baby_id) {
                return Err(StoreError::NotFound {
                    kind: "baby",
                    id: log.baby_id.to_string(),
                });
            }
            let logs = data.logs.entry(log.baby_id.clone()).or_default();
            match logs.iter_mut().find(|l| l.id == log.id) {
                Some(existing) => *existing = log.clone(),
                None => logs.push(log.clone()),
            }
            Self::logs_of(&data, &log.baby_id)
        };
        tracing::debug!(log = %log.id, baby = %log.baby_id, "saved log");
        self.log_feed.publish(&log.baby_id, &snapshot);
        Ok(())
    }

    fn subscribe_babies(&self, user_id: &UserId) -> Result<Subscription<Vec<Baby>>, StoreError> {
        let data = self.data();
        let initial = Self::babies_of(&data, user_id);
        Ok(self.baby_feed.subscribe(user_id.clone(), initial))
    }

    fn subscribe_logs(&self, baby_id: &BabyId) -> Result<Subscription<Vec<Log>>, StoreError> {
        let data = self.data();
        let initial = Self::logs_of(&data, baby_id);
        Ok(self.log_feed.subscribe(baby_id.clone(), initial))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::*;
    use crate::model::{Gender, LogDetails};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn baby(name: &str) -> Baby {
        Baby::new(name, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), Gender::Girl).unwrap()
    }

    fn sleep_at(baby_id: &BabyId, start: &str) -> Log {
        let start: DateTime<Utc> = start.parse().unwrap();
        Log::new(
            baby_id.clone(),
            start,
            Some(start + chrono::Duration::minutes(30)),
            LogDetails::Sleep { notes: None },
        )
        .unwrap()
    }

    #[test]
    fn log_snapshots_are_newest_first() {
        let store = MemoryStore::new();
        let child = baby("Aziza");
        store.save_baby(&child, &user()).unwrap();
        store.save_log(&sleep_at(&child.id, "2025-03-10T08:00:00Z")).unwrap();
        store.save_log(&sleep_at(&child.id, "2025-03-12T08:00:00Z")).unwrap();
        store.save_log(&sleep_at(&child.id, "2025-03-11T08:00:00Z")).unwrap();

        let mut sub = store.subscribe_logs(&child.id).unwrap();
        let days: Vec<u32> = sub
            .try_next()
            .unwrap()
            .iter()
            .map(|l| chrono::Datelike::day(&l.start_time))
            .collect();
        assert_eq!(days, vec![12, 11, 10]);
    }

    #[test]
    fn writes_push_to_subscribers() {
        let store = MemoryStore::new();
        let mut babies = store.subscribe_babies(&user()).unwrap();
        assert_eq!(babies.try_next(), Some(vec![]));

        let child = baby("Aziza");
        store.save_baby(&child, &user()).unwrap();
        assert_eq!(babies.try_next().map(|b| b.len()), Some(1));

        let mut logs = store.subscribe_logs(&child.id).unwrap();
        assert_eq!(logs.try_next(), Some(vec![]));
        store.save_log(&sleep_at(&child.id, "2025-03-10T08:00:00Z")).unwrap();
        assert_eq!(logs.try_next().map(|l| l.len()), Some(1));
    }

    #[test]
    fn babies_are_partitioned_by_user() {
        let store = MemoryStore::new();
        let other = UserId::new("user-2").unwrap();
        store.save_baby(&baby("Aziza"), &user()).unwrap();
        store.save_baby(&baby("Timur"), &other).unwrap();

        let mut sub = store.subscribe_babies(&other).unwrap();
        let names: Vec<String> = sub.try_next().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Timur"]);
    }

    #[test]
    fn save_log_rejects_inverted_times() {
        let store = MemoryStore::new();
        let child = baby("Aziza");
        store.save_baby(&child, &user()).unwrap();
        let mut log = sleep_at(&child.id, "2025-03-10T08:00:00Z");
        log.end_time = Some(log.start_time - chrono::Duration::minutes(1));
        assert!(matches!(store.save_log(&log), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn delete_unknown_baby_is_not_found() {
        let store = MemoryStore::new();
        let missing = BabyId::new("nope").unwrap();
        assert!(matches!(
            store.delete_baby(&missing),
            Err(StoreError::NotFound { kind: "baby", .. })
        ));
    }
}
