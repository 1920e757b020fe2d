use anyhow::{bail, Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, LevelFilter};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::models::{Host, PlatformKind};

fn default_interval_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_prune_interval_ms() -> u64 {
    60_000
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_endpoint() -> String {
    crate::client::metrics::DEFAULT_ENDPOINT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The hosts watched when no configuration file overrides them.
pub fn default_hosts() -> Vec<HostConfig> {
    vec![
        HostConfig::new("Workstation", "192.168.1.10:5000", PlatformKind::X86),
        HostConfig::new("Home Server", "192.168.1.11:5000", PlatformKind::X86),
        HostConfig::new("Raspberry Pi", "192.168.1.20:5000", PlatformKind::Arm),
    ]
}

fn deserialize_platform<'de, D>(deserializer: D) -> Result<PlatformKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    value.parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_prune_interval_ms")]
    pub prune_interval_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            prune_interval_ms: default_prune_interval_ms(),
            history_capacity: default_history_capacity(),
            endpoint: default_endpoint(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_millis(self.prune_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HostConfig {
    pub name: String,
    pub address: String,
    #[serde(deserialize_with = "deserialize_platform")]
    pub platform: PlatformKind,
}

impl HostConfig {
    pub fn new(name: &str, address: &str, platform: PlatformKind) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            platform,
        }
    }
}

impl From<&HostConfig> for Host {
    fn from(config: &HostConfig) -> Self {
        Host::new(config.name.clone(), config.address.clone(), config.platform)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_hosts")]
    pub hosts: Vec<HostConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
            hosts: default_hosts(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file("config.toml")
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    /// Host list in configured order.
    pub fn hosts(&self) -> Vec<Host> {
        self.hosts.iter().map(Host::from).collect()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms == 0 || self.polling.prune_interval_ms == 0 {
            bail!("Polling intervals must be greater than zero");
        }
        if self.polling.timeout_ms == 0 {
            bail!("Request timeout must be greater than zero");
        }
        if self.polling.history_capacity == 0 {
            bail!("History capacity must be greater than zero");
        }
        if self.hosts.is_empty() {
            bail!("No hosts configured");
        }

        let mut seen = HashSet::new();
        for host in &self.hosts {
            if !seen.insert(host.name.as_str()) {
                bail!("Duplicate host name: {}", host.name);
            }
        }
        Ok(())
    }
}
