//! Settings management for termscan.
//!
//! Provides TOML-based settings loaded from a dotfile in the working
//! directory, with environment variable overrides. All knobs have working
//! defaults so the tool runs with no settings file at all.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = ".termscan.toml";

/// Default blocked-term database file name.
pub const BLOCK_DB_FILE: &str = ".termscan.cfg";

/// Default allow-list file name.
pub const ALLOW_DB_FILE: &str = ".termscan-allowed.txt";

/// Scan behavior settings.
///
/// Loaded from [`SETTINGS_FILE`] when present; otherwise defaults apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Number of concurrent path workers (default: available core count)
    pub workers: usize,
    /// Wall-clock timeout per search invocation, in seconds
    pub search_timeout_secs: u64,
    /// Path of the blocked-term database file
    pub block_db_path: String,
    /// Path of the allow-list file
    pub allow_db_path: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            search_timeout_secs: 10,
            block_db_path: BLOCK_DB_FILE.to_string(),
            allow_db_path: ALLOW_DB_FILE.to_string(),
        }
    }
}

/// One worker per available core, falling back to 4 when the core count
/// cannot be determined.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

impl ScanSettings {
    /// Load settings from [`SETTINGS_FILE`] in the working directory,
    /// falling back to defaults if the file is absent.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed, or if
    /// a value fails validation.
    pub fn load() -> SettingsResult<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load settings from an explicit path, falling back to defaults if the
    /// file is absent.
    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        let settings: Self = if path.exists() {
            tracing::debug!("Loading settings from {}", path.display());
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Settings file not found, using defaults");
            Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `TERMSCAN_WORKERS`: override the worker count
    /// - `TERMSCAN_SEARCH_TIMEOUT_SECS`: override the per-path search timeout
    pub fn load_with_env() -> SettingsResult<Self> {
        let mut settings = Self::load()?;

        if let Ok(val) = std::env::var("TERMSCAN_WORKERS") {
            if let Ok(workers) = val.parse() {
                settings.workers = workers;
                tracing::debug!("Override workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("TERMSCAN_SEARCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                settings.search_timeout_secs = secs;
                tracing::debug!("Override search_timeout_secs from env: {}", secs);
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings values.
    fn validate(&self) -> SettingsResult<()> {
        if self.workers == 0 {
            return Err(SettingsError::InvalidValue {
                field: "workers".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search_timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                field: "search_timeout_secs".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
