//! Lullaby player driven by typed commands.
//!
//! Lists the catalog, then reads one command per line until `q` or end of
//! input: `play N`, `p` (play/pause), `next`, `prev`, `seek SECONDS`,
//! `loop`, `end` (the track finished).

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use babysteps_core::catalog::{LULLABIES, Track, format_short_time};
use babysteps_core::{PlaybackBackend, PlaybackController, PlaybackError};

/// Bytes per second of a 128 kbit/s constant-bitrate MP3.
const MP3_BYTES_PER_SECOND: f64 = 16_000.0;

/// Resolves tracks to files under a media directory.
///
/// Track length is estimated from the file size at [`MP3_BYTES_PER_SECOND`].
#[derive(Debug)]
pub struct FileBackend {
    media_dir: PathBuf,
    loaded: Option<PathBuf>,
}

impl FileBackend {
    pub fn new(media_dir: &Path) -> Self {
        Self {
            media_dir: media_dir.to_path_buf(),
            loaded: None,
        }
    }
}

impl PlaybackBackend for FileBackend {
    fn load(&mut self, track: &Track) -> Result<Option<f64>, PlaybackError> {
        self.loaded = None;
        let path = self.media_dir.join(track.url.trim_start_matches('/'));
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(PlaybackError::Unavailable(path.display().to_string())),
        };
        #[expect(
            clippy::cast_precision_loss,
            reason = "audio files are far below 2^52 bytes"
        )]
        let duration = (metadata.len() as f64 / MP3_BYTES_PER_SECOND).floor();
        self.loaded = Some(path);
        Ok(Some(duration))
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.loaded.is_none() {
            return Err(PlaybackError::Blocked);
        }
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, position: f64) {
        tracing::trace!(position, "seek");
    }
}

pub fn run<W: Write, R: BufRead>(writer: &mut W, input: R, media_dir: &Path) -> Result<()> {
    for track in &LULLABIES {
        writeln!(writer, "{:>2}. {}", track.id, track.title)?;
    }

    let mut player = PlaybackController::new(FileBackend::new(media_dir), &LULLABIES);
    for line in input.lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let result = match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("q"), _) => break,
            (Some("play"), Some(id)) => match id.parse() {
                Ok(id) => player.play(id),
                Err(_) => {
                    writeln!(writer, "not a track number: {id}")?;
                    continue;
                }
            },
            (Some("p"), _) => player.play_pause(),
            (Some("next"), _) => player.next(),
            (Some("prev"), _) => player.previous(),
            (Some("seek"), Some(secs)) => match secs.parse::<f64>() {
                Ok(position) if position.is_finite() => {
                    player.seek(position);
                    Ok(())
                }
                _ => {
                    writeln!(writer, "not a position in seconds: {secs}")?;
                    continue;
                }
            },
            (Some("loop"), _) => {
                player.toggle_loop();
                Ok(())
            }
            (Some("end"), _) => player.on_ended(),
            (Some(other), _) => {
                writeln!(writer, "unknown command: {other}")?;
                continue;
            }
        };
        if let Err(err) = result {
            writeln!(writer, "error: {err}")?;
        }
        status(writer, &player)?;
    }
    Ok(())
}

fn status<W: Write>(writer: &mut W, player: &PlaybackController<FileBackend>) -> Result<()> {
    let state = player.state();
    let Some(track) = player.current_track() else {
        writeln!(writer, "stopped")?;
        return Ok(());
    };
    writeln!(
        writer,
        "{} {}. {} {}/{}{}",
        if state.is_playing { "playing" } else { "paused" },
        track.id,
        track.title,
        format_short_time(state.position),
        format_short_time(state.duration),
        if state.loop_enabled { " (loop)" } else { "" }
    )?;
    Ok(())
}
