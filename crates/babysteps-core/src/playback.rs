//! Single-handle media playback and the video picker.
//!
//! The controller owns the transport state; the platform player sits behind
//! [`PlaybackBackend`] and reports progress back through
//! [`PlaybackController::on_time_update`], [`PlaybackController::set_duration`]
//! and [`PlaybackController::on_ended`].

use thiserror::Error;

use crate::catalog::{Track, Video};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback was blocked by the platform")]
    Blocked,

    #[error("media could not be loaded: {0}")]
    Unavailable(String),

    #[error("track {0} is not in the catalog")]
    UnknownTrack(u32),

    #[error("catalog is empty")]
    EmptyCatalog,
}

/// Platform audio player.
pub trait PlaybackBackend {
    /// Replaces the current media source and returns its length in seconds
    /// when it is already known. Backends that learn it later report it
    /// through [`PlaybackController::set_duration`].
    fn load(&mut self, track: &Track) -> Result<Option<f64>, PlaybackError>;

    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn seek(&mut self, position: f64);
}

/// Transport state of the single playback handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current_track_id: Option<u32>,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    pub loop_enabled: bool,
}

/// Play/pause/seek/loop/next/previous over a fixed ordered catalog.
#[derive(Debug)]
pub struct PlaybackController<B> {
    backend: B,
    tracks: &'static [Track],
    state: PlaybackState,
}

impl<B: PlaybackBackend> PlaybackController<B> {
    pub const fn new(backend: B, tracks: &'static [Track]) -> Self {
        Self {
            backend,
            tracks,
            state: PlaybackState {
                current_track_id: None,
                is_playing: false,
                position: 0.0,
                duration: 0.0,
                loop_enabled: false,
            },
        }
    }

    pub const fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_track(&self) -> Option<&'static Track> {
        let id = self.state.current_track_id?;
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Loads `track_id` from position zero and starts it.
    pub fn play(&mut self, track_id: u32) -> Result<(), PlaybackError> {
        let tracks = self.tracks;
        let Some(track) = tracks.iter().find(|t| t.id == track_id) else {
            return Err(PlaybackError::UnknownTrack(track_id));
        };

        self.state.is_playing = false;
        self.state.current_track_id = Some(track.id);
        self.state.position = 0.0;
        self.state.duration = 0.0;

        match self.backend.load(track) {
            Ok(Some(duration)) => self.set_duration(duration),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(track = track.id, error = %err, "failed to load track");
                return Err(err);
            }
        }
        self.resume()
    }

    /// Toggles between playing and paused; with nothing loaded, plays the
    /// first catalog entry.
    pub fn play_pause(&mut self) -> Result<(), PlaybackError> {
        if self.state.current_track_id.is_none() {
            return self.play_first();
        }
        if self.state.is_playing {
            self.backend.pause();
            self.state.is_playing = false;
            Ok(())
        } else {
            self.resume()
        }
    }

    /// Jumps to `position`, clamped to the known duration.
    pub fn seek(&mut self, position: f64) {
        let position = position.clamp(0.0, self.state.duration.max(0.0));
        self.backend.seek(position);
        self.state.position = position;
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        self.step(|idx, len| (idx + 1) % len)
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        self.step(|idx, len| (idx + len - 1) % len)
    }

    /// Flips auto-restart on completion and returns the new setting.
    pub const fn toggle_loop(&mut self) -> bool {
        self.state.loop_enabled = !self.state.loop_enabled;
        self.state.loop_enabled
    }

    /// Natural end of the current track.
    pub fn on_ended(&mut self) -> Result<(), PlaybackError> {
        self.state.position = 0.0;
        if self.state.loop_enabled {
            self.backend.seek(0.0);
            self.resume()
        } else {
            self.state.is_playing = false;
            Ok(())
        }
    }

    pub fn on_time_update(&mut self, position: f64) {
        self.state.position = position;
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.state.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
    }

    fn play_first(&mut self) -> Result<(), PlaybackError> {
        let first = self.tracks.first().ok_or(PlaybackError::EmptyCatalog)?;
        self.play(first.id)
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> Result<(), PlaybackError> {
        let Some(idx) = self
            .state
            .current_track_id
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
        else {
            return self.play_first();
        };

        let target = advance(idx, self.tracks.len());
        self.play(self.tracks[target].id)
    }

    fn resume(&mut self) -> Result<(), PlaybackError> {
        match self.backend.play() {
            Ok(()) => {
                self.state.is_playing = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    track = ?self.state.current_track_id,
                    error = %err,
                    "playback did not start"
                );
                self.state.is_playing = false;
                Err(err)
            }
        }
    }
}

/// Picker over the hosted video catalog. Tracks only which entry is active.
#[derive(Debug, Clone)]
pub struct VideoBrowser {
    videos: &'static [Video],
    active: Option<u32>,
}

impl VideoBrowser {
    #[must_use]
    pub const fn new(videos: &'static [Video]) -> Self {
        Self {
            videos,
            active: None,
        }
    }

    #[must_use]
    pub const fn videos(&self) -> &'static [Video] {
        self.videos
    }

    /// Makes `id` the active video; unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: u32) -> Option<&'static Video> {
        let video = self.videos.iter().find(|v| v.id == id)?;
        self.active = Some(id);
        Some(video)
    }

    #[must_use]
    pub fn active(&self) -> Option<&'static Video> {
        let id = self.active?;
        self.videos.iter().find(|v| v.id == id)
    }
}
