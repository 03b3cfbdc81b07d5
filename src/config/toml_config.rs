use crate::core::monitor::DEFAULT_OFFLINE_AFTER_MINUTES;
use crate::core::playlist::DEFAULT_MIN_TARGET_SIZE;
use crate::utils::error::{CondoTvError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    #[serde(default = "default_min_target_size")]
    pub min_target_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
    #[serde(default)]
    pub feeds: Vec<NewsFeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFeedConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_offline_after_minutes")]
    pub offline_after_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            min_target_size: default_min_target_size(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_seconds: default_timeout_seconds(),
            max_age_hours: default_max_age_hours(),
            description_max_chars: default_description_max_chars(),
            feeds: Vec::new(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            offline_after_minutes: default_offline_after_minutes(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_min_target_size() -> usize {
    DEFAULT_MIN_TARGET_SIZE
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_age_hours() -> u64 {
    24
}

fn default_description_max_chars() -> usize {
    200
}

fn default_offline_after_minutes() -> i64 {
    DEFAULT_OFFLINE_AFTER_MINUTES
}

fn default_snapshot_path() -> String {
    "./condo-tv.json".to_string()
}

impl AppConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CondoTvError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CondoTvError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CondoTvError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("playlist.min_target_size", self.playlist.min_target_size, 1)?;
        validate_range("news.timeout_seconds", self.news.timeout_seconds, 1, 120)?;
        validate_positive_number("news.max_age_hours", self.news.max_age_hours as usize, 1)?;
        validate_positive_number(
            "news.description_max_chars",
            self.news.description_max_chars,
            1,
        )?;

        for feed in &self.news.feeds {
            validate_non_empty_string("news.feeds.name", &feed.name)?;
            validate_url("news.feeds.url", &feed.url)?;
        }

        validate_range(
            "monitor.offline_after_minutes",
            self.monitor.offline_after_minutes,
            1,
            24 * 60,
        )?;
        validate_path("store.snapshot_path", &self.store.snapshot_path)?;

        Ok(())
    }

    pub fn news_enabled(&self) -> bool {
        self.news.enabled && !self.news.feeds.is_empty()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
