use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub panel: PanelConfig,

    #[serde(default)]
    pub badge: BadgeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub trackers: TrackerConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    #[serde(default = "default_panel_enable")]
    pub enable: bool,
    #[serde(default = "default_panel_host")]
    pub host: String,
    #[serde(default = "default_panel_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BadgeConfig {
    #[serde(default = "default_badge_color")]
    pub warning_color: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_enable")]
    pub enable: bool,
    #[serde(default = "default_log_blocked")]
    pub log_blocked: bool,
    #[serde(default)]
    pub log_allowed: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_decision_sinks")]
    pub decision_sinks: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TrackerConfig {
    /// Extra URL fragments appended to the built-in tracker set.
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    #[serde(default = "default_stats_enable")]
    pub enable: bool,
    #[serde(default = "default_stats_interval")]
    pub log_interval_seconds: u64,
}

// Defaults
fn default_store_path() -> String {
    "tracknix.db".to_string()
}
fn default_panel_enable() -> bool {
    true
}
fn default_panel_host() -> String {
    "127.0.0.1".to_string()
}
fn default_panel_port() -> u16 {
    8720
}
fn default_badge_color() -> String {
    "#d93025".to_string()
}
fn default_log_enable() -> bool {
    true
}
fn default_log_blocked() -> bool {
    true
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_decision_sinks() -> Vec<String> {
    vec!["console".to_string()]
}
fn default_stats_enable() -> bool {
    true
}
fn default_stats_interval() -> u64 {
    300
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            enable: default_panel_enable(),
            host: default_panel_host(),
            port: default_panel_port(),
        }
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            warning_color: default_badge_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: default_log_enable(),
            log_blocked: default_log_blocked(),
            log_allowed: false,
            format: default_log_format(),
            level: default_log_level(),
            decision_sinks: default_decision_sinks(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enable: default_stats_enable(),
            log_interval_seconds: default_stats_interval(),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }
}
