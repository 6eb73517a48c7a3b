use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::pool::{DEFAULT_HISTORY_SIZE, DEFAULT_TARGET_SIZE};
use crate::generator::wikipedia::{DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS, DEFAULT_TRIES};
use crate::store::StatsStore;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_fetch_tries")]
    pub fetch_tries: usize,
    #[serde(default = "default_pool_target_size")]
    pub pool_target_size: usize,
    #[serde(default = "default_pool_history_size")]
    pub pool_history_size: usize,
    #[serde(default = "default_prefetch_enabled")]
    pub prefetch_enabled: bool,
    #[serde(default = "default_stats_path")]
    pub stats_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}
fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_fetch_tries() -> usize {
    DEFAULT_TRIES
}
fn default_pool_target_size() -> usize {
    DEFAULT_TARGET_SIZE
}
fn default_pool_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}
fn default_prefetch_enabled() -> bool {
    true
}
fn default_stats_path() -> String {
    StatsStore::default_path().to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wikitype")
        .join("wikitype.log")
        .to_string_lossy()
        .to_string()
}
fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            fetch_tries: default_fetch_tries(),
            pool_target_size: default_pool_target_size(),
            pool_history_size: default_pool_history_size(),
            prefetch_enabled: default_prefetch_enabled(),
            stats_path: default_stats_path(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wikitype")
            .join("config.toml")
    }

    pub fn stats_path(&self) -> PathBuf {
        PathBuf::from(&self.stats_path)
    }

    /// Clamp values a hand-edited config file may get wrong.
    pub fn validate(&mut self) {
        self.max_chars = self.max_chars.max(1);
        self.min_chars = self.min_chars.min(self.max_chars);
        self.fetch_tries = self.fetch_tries.clamp(1, 20);
        self.pool_target_size = self.pool_target_size.max(1);
        if self.stats_path.trim().is_empty() {
            self.stats_path = default_stats_path();
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}
