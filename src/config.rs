//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. `config.toml` in the platform config directory, if present
//! 3. the file passed with `--config`
//! 4. `DUPECAT_*` environment variables (e.g. `DUPECAT_DISPLAY_LIMIT=50`)
//!
//! Command-line flags are applied on top by the caller.

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::actions::DeleteMode;
use crate::duplicates::DEFAULT_MIN_TERM_LENGTH;
use crate::scanner::DEFAULT_SAMPLE_SIZE;
use crate::search::{SearchMode, DEFAULT_DISPLAY_LIMIT};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DUPECAT_";

/// Errors while building the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file given with `--config` does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has values of the wrong type.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Leading bytes hashed per file.
    pub sample_size: u64,
    /// Maximum entries in a listing.
    pub display_limit: usize,
    /// Minimum shared-token length for stats and duplicate grouping.
    pub search_min_length: usize,
    /// Default token matching mode for term search.
    pub search_mode: SearchMode,
    /// How duplicate files are removed.
    pub delete_mode: DeleteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            search_min_length: DEFAULT_MIN_TERM_LENGTH,
            search_mode: SearchMode::default(),
            delete_mode: DeleteMode::default(),
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails if `explicit` does not exist or any layer is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let config: Config = Self::figment(Self::default_path().as_deref(), explicit).extract()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// The provider stack behind [`load`](Self::load).
    ///
    /// Missing files are skipped by figment.
    #[must_use]
    pub fn figment(platform: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = platform {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["log"]))
    }

    /// Platform-specific `config.toml` path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupecat", "dupecat")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
