//! Application state container.
//!
//! All mutation goes through the narrow operations below so the active-child
//! invariant is enforced in one place: `active_baby_id` is either `None` or
//! the id of a member of `babies`.

use serde::{Deserialize, Serialize};

use crate::model::{Baby, Log, Theme, User};
use crate::types::{BabyId, LogId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    user: Option<User>,
    babies: Vec<Baby>,
    active_baby_id: Option<BabyId>,
    logs: Vec<Log>,
    theme: Theme,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn babies(&self) -> &[Baby] {
        &self.babies
    }

    pub const fn active_baby_id(&self) -> Option<&BabyId> {
        self.active_baby_id.as_ref()
    }

    pub fn active_baby(&self) -> Option<&Baby> {
        let id = self.active_baby_id.as_ref()?;
        self.babies.iter().find(|b| &b.id == id)
    }

    /// Cached logs of the active child, newest first.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Replaces the signed-in user. Signing out clears everything but the
    /// theme.
    pub fn set_user(&mut self, user: Option<User>) {
        if user.is_none() {
            let theme = self.theme;
            *self = Self {
                theme,
                ..Self::default()
            };
            return;
        }
        self.user = user;
    }

    /// Replaces the child list.
    ///
    /// Keeps the current active child when it is still listed, otherwise
    /// falls back to the first child (or none). Returns `true` when the
    /// active child changed, in which case the cached logs were cleared.
    pub fn set_babies(&mut self, babies: Vec<Baby>) -> bool {
        let keep = self
            .active_baby_id
            .as_ref()
            .is_some_and(|id| babies.iter().any(|b| &b.id == id));
        self.babies = babies;
        if keep {
            return false;
        }

        let next = self.babies.first().map(|b| b.id.clone());
        let changed = next != self.active_baby_id;
        self.active_baby_id = next;
        if changed {
            self.logs.clear();
        }
        changed
    }

    /// Selects `id` as the active child and clears the cached logs.
    ///
    /// Returns `false` and changes nothing when `id` is not a listed child.
    pub fn set_active_baby(&mut self, id: &BabyId) -> bool {
        if !self.babies.iter().any(|b| &b.id == id) {
            return false;
        }
        if self.active_baby_id.as_ref() != Some(id) {
            self.active_baby_id = Some(id.clone());
            self.logs.clear();
        }
        true
    }

    /// Optimistically shows `log` ahead of the store push.
    pub fn append_log(&mut self, log: Log) {
        self.logs.insert(0, log);
    }

    /// Undoes an optimistic append.
    pub fn remove_log(&mut self, id: &LogId) -> Option<Log> {
        let idx = self.logs.iter().position(|l| &l.id == id)?;
        Some(self.logs.remove(idx))
    }

    /// Replaces the cached logs with a store snapshot.
    pub fn replace_logs(&mut self, logs: Vec<Log>) {
        self.logs = logs;
    }

    pub const fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Re-establishes the active-child invariant after deserializing.
    pub(crate) fn repair(&mut self) {
        let babies = std::mem::take(&mut self.babies);
        let logs = std::mem::take(&mut self.logs);
        self.set_babies(babies);
        if let Some(active) = &self.active_baby_id {
            self.logs = logs.into_iter().filter(|l| &l.baby_id == active).collect();
        }
    }
}
