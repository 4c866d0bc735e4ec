//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/moodlog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/moodlog/` (~/.config/moodlog/)
//! - Data: `$XDG_DATA_HOME/moodlog/` (~/.local/share/moodlog/)
//! - State/Logs: `$XDG_STATE_HOME/moodlog/` (~/.local/state/moodlog/)

use crate::analytics::leveling::{LevelCurve, DEFAULT_LEVEL_THRESHOLDS};
use crate::analytics::{default_templates, ReportConfig};
use crate::error::{Error, Result};
use crate::types::AchievementTemplate;
use chrono::Weekday;
use serde::Deserialize;
use std::path::{Path, PathBuf};

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
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reward economy (achievements, level curve)
    #[serde(default)]
    pub rewards: RewardsConfig,

    /// Report defaults
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Plan limits
    #[serde(default)]
    pub limits: LimitsConfig,
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

/// Reward economy configuration.
///
/// Both fields fall back to the built-in economy when omitted.
#[derive(Debug, Deserialize)]
pub struct RewardsConfig {
    /// Cumulative points needed for each level, starting at 0
    #[serde(default = "default_level_thresholds")]
    pub level_thresholds: Vec<u32>,

    /// Achievement catalogue
    #[serde(default = "default_templates")]
    pub achievements: Vec<AchievementTemplate>,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            level_thresholds: default_level_thresholds(),
            achievements: default_templates(),
        }
    }
}

fn default_level_thresholds() -> Vec<u32> {
    DEFAULT_LEVEL_THRESHOLDS.to_vec()
}

/// First day of the week for weekly reports.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Report configuration
#[derive(Debug, Deserialize)]
pub struct ReportsConfig {
    /// Number of top triggers listed in reports
    #[serde(default = "default_top_triggers")]
    pub top_triggers: usize,

    #[serde(default)]
    pub week_starts_on: WeekStart,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_triggers: default_top_triggers(),
            week_starts_on: WeekStart::default(),
        }
    }
}

fn default_top_triggers() -> usize {
    5
}

/// Plan limits.
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct LimitsConfig {
    /// Entries allowed per calendar month; unlimited when absent
    pub monthly_entries: Option<u32>,
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

    /// Check the reward economy for mistakes that would otherwise only
    /// surface as odd levels or silent duplicate unlocks.
    pub fn validate(&self) -> Result<()> {
        self.level_curve()?;

        let mut ids: Vec<&str> = self
            .rewards
            .achievements
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::Config(format!(
                "duplicate achievement id: {}",
                pair[0]
            )));
        }
        if self.reports.top_triggers == 0 {
            return Err(Error::Config(
                "reports.top_triggers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated level curve.
    pub fn level_curve(&self) -> Result<LevelCurve> {
        LevelCurve::new(self.rewards.level_thresholds.clone())
    }

    /// Achievement catalogue.
    pub fn templates(&self) -> Vec<AchievementTemplate> {
        self.rewards.achievements.clone()
    }

    /// Report settings derived from `[reports]`.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            top_triggers: self.reports.top_triggers,
            ..Default::default()
        }
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/moodlog/config.toml` (~/.config/moodlog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("moodlog").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/moodlog/` (~/.local/share/moodlog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("moodlog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/moodlog/` (~/.local/state/moodlog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("moodlog")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/moodlog/journal.db` (~/.local/share/moodlog/journal.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("journal.db")
    }
}
