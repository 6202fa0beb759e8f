//! Sleep session stopwatch.
//!
//! [`SessionTimer`] is the state machine only: it counts whatever ticks it is
//! given. The once-per-second schedule lives in [`crate::ticker`], which asks
//! the timer whether a tick source is needed before spawning one.

use chrono::{DateTime, Utc};

use crate::locale::Locale;
use crate::model::{Log, LogDetails};
use crate::types::{BabyId, LogId};

/// Lifecycle of a timing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// A start/pause/stop stopwatch that produces a sleep log on stop.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    state: TimerState,
    elapsed_seconds: u64,
}

impl SessionTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_seconds: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Starts or resumes counting.
    ///
    /// Returns `false` when already running, so callers never schedule a
    /// second tick source.
    pub const fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Halts counting and keeps the elapsed time.
    pub const fn pause(&mut self) {
        if self.is_running() {
            self.state = TimerState::Paused;
        }
    }

    /// Advances by one second while running.
    pub const fn tick(&mut self) {
        if self.is_running() {
            self.elapsed_seconds += 1;
        }
    }

    /// Ends the session and resets to idle.
    ///
    /// With an active child the session becomes a sleep log ending at `now`;
    /// without one the timer still resets and nothing is produced.
    pub fn stop(
        &mut self,
        active_baby: Option<&BabyId>,
        now: DateTime<Utc>,
        locale: Locale,
    ) -> Option<Log> {
        let elapsed = self.elapsed_seconds;
        self.state = TimerState::Idle;
        self.elapsed_seconds = 0;

        let Some(baby_id) = active_baby else {
            tracing::debug!(elapsed, "timer stopped without an active child");
            return None;
        };

        let elapsed_delta = chrono::Duration::seconds(i64::try_from(elapsed).unwrap_or(i64::MAX));
        let start_time = now - elapsed_delta;
        Some(Log {
            id: LogId::generate(),
            baby_id: baby_id.clone(),
            start_time,
            end_time: Some(now),
            details: LogDetails::Sleep {
                notes: Some(locale.timer_note(&format_clock(elapsed))),
            },
        })
    }

    /// Elapsed time as `HH:MM:SS`.
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.elapsed_seconds)
    }
}

/// Formats a second count as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
