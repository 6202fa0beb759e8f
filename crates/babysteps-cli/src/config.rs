//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use babysteps_core::Locale;
use babysteps_core::snapshot;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Local JSON snapshot of the app state (active child, theme, cached logs).
    pub snapshot_path: PathBuf,
    /// Lullaby audio files, laid out as `lullabies/<title>.mp3`.
    pub media_dir: PathBuf,
    /// Local account standing in for the hosted sign-in.
    pub user_id: String,
    pub user_name: String,
    pub locale: Locale,
    /// Assistant API key. Without it `ask` answers with a system error line.
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("snapshot_path", &self.snapshot_path)
            .field("media_dir", &self.media_dir)
            .field("user_id", &self.user_id)
            .field("locale", &self.locale)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self::with_data_dir(&data_dir)
    }
}

impl Config {
    /// Default configuration with every file placed under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            database_path: data_dir.join("babysteps.db"),
            snapshot_path: data_dir.join(snapshot::file_name()),
            media_dir: data_dir.join("media"),
            user_id: "local".to_string(),
            user_name: "Parent".to_string(),
            locale: Locale::default(),
            api_key: None,
            model: babysteps_llm::DEFAULT_MODEL.to_string(),
            api_url: babysteps_llm::GROQ_API_URL.to_string(),
        }
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // BABYSTEPS_*
        figment = figment.merge(Env::prefixed("BABYSTEPS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("babysteps"))
}

/// Returns the platform-specific data directory.
///
/// On Linux: `~/.local/share/babysteps`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("babysteps"))
}
