//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/caseboard/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/caseboard/` (~/.config/caseboard/)
//! - Data: `$XDG_DATA_HOME/caseboard/` (~/.local/share/caseboard/)
//! - State/Logs: `$XDG_STATE_HOME/caseboard/` (~/.local/state/caseboard/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the case file location.
pub const CASES_JSON_ENV: &str = "CASES_JSON";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where cases come from
    #[serde(default)]
    pub store: StoreConfig,

    /// Board paging and refresh timing
    #[serde(default)]
    pub board: BoardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Case store location
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Path to the case store's `cases.json`
    pub path: Option<PathBuf>,

    /// Base URL of the case store API. When set, the board reads the TV
    /// feed instead of the file.
    pub url: Option<String>,
}

impl StoreConfig {
    /// Case file path after applying the `CASES_JSON` override and the
    /// default location.
    pub fn resolved_path(&self) -> PathBuf {
        std::env::var_os(CASES_JSON_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.path.clone())
            .unwrap_or_else(Config::default_cases_path)
    }
}

/// Board paging and timing
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Cases per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Seconds between case list refreshes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Dwell time contributed by each case on the page, in milliseconds
    #[serde(default = "default_dwell_per_case")]
    pub dwell_per_case_ms: u64,

    /// Shortest time any page stays up, in seconds
    #[serde(default = "default_min_dwell")]
    pub min_dwell_secs: u64,

    /// HTTP timeout when reading the TV feed, in seconds
    #[serde(default = "default_feed_timeout")]
    pub feed_timeout_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            poll_interval_secs: default_poll_interval(),
            dwell_per_case_ms: default_dwell_per_case(),
            min_dwell_secs: default_min_dwell(),
            feed_timeout_secs: default_feed_timeout(),
        }
    }
}

impl BoardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// How long a page showing `cases_on_page` cases stays up.
    pub fn dwell_for(&self, cases_on_page: usize) -> Duration {
        let per_case = Duration::from_millis(self.dwell_per_case_ms);
        let scaled = per_case.saturating_mul(u32::try_from(cases_on_page).unwrap_or(u32::MAX));
        scaled.max(Duration::from_secs(self.min_dwell_secs))
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config(
                "board.page_size must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(Error::Config(
                "board.poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_page_size() -> usize {
    crate::pager::DEFAULT_PAGE_SIZE
}

fn default_poll_interval() -> u64 {
    60
}

fn default_dwell_per_case() -> u64 {
    1500
}

fn default_min_dwell() -> u64 {
    5
}

fn default_feed_timeout() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.board.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/caseboard/config.toml` (~/.config/caseboard/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("caseboard").join("config.toml")
    }

    /// Returns the data directory path
    ///
    /// `$XDG_DATA_HOME/caseboard/` (~/.local/share/caseboard/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("caseboard")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/caseboard/` (~/.local/state/caseboard/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("caseboard")
    }

    /// Returns the default case file path
    ///
    /// `$XDG_DATA_HOME/caseboard/cases.json` (~/.local/share/caseboard/cases.json)
    pub fn default_cases_path() -> PathBuf {
        Self::data_dir().join("cases.json")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/caseboard/caseboard.log` (~/.local/state/caseboard/caseboard.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("caseboard.log")
    }
}
