//! Local snapshot of the whole application state.
//!
//! One JSON blob under a fixed storage key. Reads never fail: a missing or
//! unreadable blob yields the empty initial state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::state::AppState;

/// Storage key; also the snapshot file stem.
pub const STORAGE_KEY: &str = "baby_steps_data_v1";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write snapshot to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Default file name for the snapshot inside a data directory.
#[must_use]
pub fn file_name() -> String {
    format!("{STORAGE_KEY}.json")
}

/// Reads the snapshot at `path`.
///
/// Corrupt or missing data falls back to [`AppState::default`].
#[must_use]
pub fn load(path: &Path) -> AppState {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppState>(&content) {
            Ok(mut state) => {
                state.repair();
                state
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupt snapshot, starting from empty state"
                );
                AppState::default()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => AppState::default(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read snapshot, starting from empty state"
            );
            AppState::default()
        }
    }
}

/// Writes `state` to `path` via a temp file and rename.
pub fn save(path: &Path, state: &AppState) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err(parent))?;
    }

    let content = serde_json::to_string_pretty(state)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content).map_err(write_err(&tmp_path))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(path)(e));
    }
    tracing::debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> SnapshotError + use<> {
    let path = path.to_path_buf();
    move |source| SnapshotError::Write { path, source }
}
