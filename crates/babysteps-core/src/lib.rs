//! Core domain logic for the baby-care tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Summary: rolling sleep totals, health classification and the weekly chart
//! - Timer: the sleep session stopwatch and its tick driver
//! - Entry: resolving manual form input into well-formed logs
//! - Playback: lullaby transport controls and the video picker
//! - Controller: application state fed by cancellable store subscriptions

pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod controller;
pub mod entry;
pub mod history;
pub mod home;
pub mod locale;
pub mod model;
pub mod playback;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod subscription;
pub mod summary;
pub mod ticker;
pub mod timer;
pub mod types;

pub use controller::{AppController, ControllerError};
pub use entry::{EntryError, ManualEntry, ManualKind, resolve_manual_entry};
pub use locale::Locale;
pub use model::{Baby, DiaperKind, FeedingKind, Gender, Log, LogDetails, LogType, Theme, User};
pub use playback::{PlaybackBackend, PlaybackController, PlaybackError, PlaybackState};
pub use state::AppState;
pub use store::{EventStore, MemoryStore, StoreError};
pub use subscription::{Publisher, Subscription};
pub use summary::{DailySleep, HealthStatus, Summary, classify, summarize};
pub use ticker::TimerDriver;
pub use timer::{SessionTimer, TimerState};
pub use types::{BabyId, LogId, UserId, ValidationError};
