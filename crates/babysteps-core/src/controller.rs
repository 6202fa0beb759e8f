//! Top-level owner of application state and store subscriptions.
//!
//! The controller holds at most one baby-list subscription (keyed by user) and
//! one log subscription (keyed by the active child). Changing either key
//! cancels the old subscription before the new one is opened.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::entry::{EntryError, ManualEntry, resolve_manual_entry};
use crate::locale::Locale;
use crate::model::{Baby, Gender, Log, Theme, User};
use crate::state::AppState;
use crate::store::{EventStore, StoreError};
use crate::subscription::Subscription;
use crate::summary::{Summary, summarize};
use crate::types::{BabyId, ValidationError};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("child {0} is not in the list")]
    UnknownBaby(BabyId),

    #[error("the last remaining child cannot be deleted")]
    LastChild,

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ControllerError {
    /// Message shown to the parent.
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::Entry(e) => e.message(locale),
            Self::LastChild => locale.keep_one_child().to_string(),
            other => format!("{}{other}", locale.error_prefix()),
        }
    }
}

#[derive(Debug)]
pub struct AppController<S> {
    store: S,
    state: AppState,
    locale: Locale,
    babies_sub: Option<Subscription<Vec<Baby>>>,
    logs_sub: Option<(BabyId, Subscription<Vec<Log>>)>,
}

impl<S: EventStore> AppController<S> {
    pub const fn new(store: S, state: AppState, locale: Locale) -> Self {
        Self {
            store,
            state,
            locale,
            babies_sub: None,
            logs_sub: None,
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Signs `user` in and subscribes to their children.
    pub fn sign_in(&mut self, user: User) -> Result<(), ControllerError> {
        self.cancel_subscriptions();
        let babies_sub = self.store.subscribe_babies(&user.id)?;
        tracing::debug!(user = %user.id, "subscribed to babies");
        self.state.set_user(Some(user));
        self.babies_sub = Some(babies_sub);
        self.sync()
    }

    pub fn sign_out(&mut self) {
        self.cancel_subscriptions();
        self.state.set_user(None);
    }

    /// Applies every pending store push.
    ///
    /// A new baby list may move the active child, in which case the log
    /// subscription follows it.
    pub fn sync(&mut self) -> Result<(), ControllerError> {
        if let Some(babies) = self.babies_sub.as_mut().and_then(Subscription::latest) {
            self.state.set_babies(babies);
        }
        self.follow_active_baby()?;
        if let Some(logs) = self.logs_sub.as_mut().and_then(|(_, sub)| sub.latest()) {
            self.state.replace_logs(logs);
        }
        Ok(())
    }

    /// Makes `id` the active child.
    ///
    /// The previous child's log subscription is cancelled and the cached logs
    /// cleared before the new subscription is opened; its first snapshot is
    /// applied by the next [`sync`](Self::sync).
    pub fn switch_baby(&mut self, id: &BabyId) -> Result<(), ControllerError> {
        if !self.state.set_active_baby(id) {
            return Err(ControllerError::UnknownBaby(id.clone()));
        }
        self.follow_active_baby()
    }

    /// Saves a new child and makes it active.
    pub fn add_baby(
        &mut self,
        name: &str,
        dob: NaiveDate,
        gender: Gender,
    ) -> Result<Baby, ControllerError> {
        let user_id = self
            .state
            .user()
            .map(|u| u.id.clone())
            .ok_or(ControllerError::NotSignedIn)?;
        let baby = Baby::new(name, dob, gender)?;
        self.store.save_baby(&baby, &user_id)?;
        self.sync()?;
        self.switch_baby(&baby.id)?;
        self.sync()?;
        Ok(baby)
    }

    /// Deletes a child, refusing to remove the last one.
    pub fn delete_baby(&mut self, id: &BabyId) -> Result<(), ControllerError> {
        if !self.state.babies().iter().any(|b| &b.id == id) {
            return Err(ControllerError::UnknownBaby(id.clone()));
        }
        if self.state.babies().len() <= 1 {
            return Err(ControllerError::LastChild);
        }
        self.store.delete_baby(id)?;
        self.sync()
    }

    /// Shows `log` immediately and writes it to the store.
    ///
    /// A failed write removes the optimistic entry again and returns the
    /// error.
    pub fn record_log(&mut self, log: Log) -> Result<(), ControllerError> {
        log.validate()?;
        let id = log.id.clone();
        self.state.append_log(log.clone());
        if let Err(e) = self.store.save_log(&log) {
            tracing::warn!(log = %id, error = %e, "store write failed, rolling back");
            self.state.remove_log(&id);
            return Err(e.into());
        }
        self.sync()
    }

    /// Resolves a manual form submission for the active child and records it.
    pub fn add_manual_entry(
        &mut self,
        entry: &ManualEntry,
        now: DateTime<Utc>,
    ) -> Result<Log, ControllerError> {
        let log = resolve_manual_entry(entry, self.state.active_baby_id(), now, self.locale)?;
        self.record_log(log.clone())?;
        Ok(log)
    }

    /// Summary for the active child, if one is selected.
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<Summary> {
        let baby = self.state.active_baby()?;
        Some(summarize(self.state.logs(), baby, now, self.locale))
    }

    pub const fn toggle_theme(&mut self) -> Theme {
        self.state.toggle_theme()
    }

    fn follow_active_baby(&mut self) -> Result<(), ControllerError> {
        let active = self.state.active_baby_id().cloned();
        let current = self.logs_sub.as_ref().map(|(id, _)| id);
        if current == active.as_ref() {
            return Ok(());
        }

        if let Some((old, mut sub)) = self.logs_sub.take() {
            sub.cancel();
            tracing::debug!(baby = %old, "cancelled log subscription");
        }
        self.state.replace_logs(Vec::new());

        if let Some(id) = active {
            let sub = self.store.subscribe_logs(&id)?;
            tracing::debug!(baby = %id, "subscribed to logs");
            self.logs_sub = Some((id, sub));
        }
        Ok(())
    }

    fn cancel_subscriptions(&mut self) {
        if let Some(mut sub) = self.babies_sub.take() {
            sub.cancel();
        }
        if let Some((_, mut sub)) = self.logs_sub.take() {
            sub.cancel();
        }
    }
}
