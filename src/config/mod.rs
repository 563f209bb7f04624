// Configuration loading and management.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::strategy::{
    RandomWithinWindow, RefreshStrategy, Scheduled, StaticLifetimeLeft, StaticLifetimeSpent,
    StaticTime, TwoThirdsLifetime,
};

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15 * 60);
const DEFAULT_INITIAL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub env: String,
    pub logs: Option<Logs>,
    #[serde(rename = "refresher", default)]
    pub schedule: Schedule,
    pub storage: Option<Persistence>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

/// The `refresher` section: naming, retry and scheduling policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Schedule {
    pub name: Option<String>,
    #[serde(rename = "retry_delay", with = "humantime_serde", default = "default_retry_delay")]
    pub retry_delay: Duration,
    #[serde(rename = "initial_timeout", with = "humantime_serde", default = "default_initial_timeout")]
    pub initial_timeout: Duration,
    #[serde(rename = "stats_interval", with = "humantime_serde", default = "default_stats_interval")]
    pub stats_interval: Duration,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            name: None,
            retry_delay: DEFAULT_RETRY_DELAY,
            initial_timeout: DEFAULT_INITIAL_TIMEOUT,
            stats_interval: DEFAULT_STATS_INTERVAL,
            strategy: StrategyConfig::default(),
        }
    }
}

fn default_retry_delay() -> Duration {
    DEFAULT_RETRY_DELAY
}

fn default_initial_timeout() -> Duration {
    DEFAULT_INITIAL_TIMEOUT
}

fn default_stats_interval() -> Duration {
    DEFAULT_STATS_INTERVAL
}

/// The `storage` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Persistence {
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

/// Refresh strategy selection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    #[default]
    TwoThirds,
    RandomWindow {
        min: f64,
        max: f64,
    },
    StaticLifetimeLeft {
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    StaticLifetimeSpent {
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    StaticTime {
        at: DateTime<Utc>,
    },
    Scheduled {
        times: Vec<DateTime<Utc>>,
    },
}

impl StrategyConfig {
    /// Builds the configured strategy.
    pub fn build<T>(&self) -> Arc<dyn RefreshStrategy<T>> {
        match self {
            StrategyConfig::TwoThirds => Arc::new(TwoThirdsLifetime),
            StrategyConfig::RandomWindow { min, max } => Arc::new(RandomWithinWindow::new(*min, *max)),
            StrategyConfig::StaticLifetimeLeft { duration } => Arc::new(StaticLifetimeLeft::new(*duration)),
            StrategyConfig::StaticLifetimeSpent { duration } => Arc::new(StaticLifetimeSpent::new(*duration)),
            StrategyConfig::StaticTime { at } => Arc::new(StaticTime::new(*at)),
            StrategyConfig::Scheduled { times } => Arc::new(Scheduled::new(times.iter().copied())),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        // Read file
        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("load config from {:?}", abs_path))
    }

    /// Parses and validates configuration from YAML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.schedule.retry_delay.is_zero() {
            anyhow::bail!("refresher.retry_delay must be greater than zero");
        }
        if self.schedule.stats_interval.is_zero() {
            anyhow::bail!("refresher.stats_interval must be greater than zero");
        }
        if let StrategyConfig::RandomWindow { min, max } = self.schedule.strategy {
            if !min.is_finite() || !max.is_finite() {
                anyhow::bail!("refresher.strategy random_window bounds must be finite numbers");
            }
        }
        if let Some(storage) = &self.storage {
            if storage.enabled && storage.path.is_none() {
                anyhow::bail!("storage.path is required when storage is enabled");
            }
        }
        Ok(())
    }

    pub fn is_prod(&self) -> bool {
        self.env == PROD
    }

    pub fn is_test(&self) -> bool {
        self.env == TEST
    }

    pub fn log_level(&self) -> &str {
        self.logs
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Returns the storage file path when persistence is enabled.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage
            .as_ref()
            .filter(|s| s.enabled)
            .and_then(|s| s.path.as_deref())
    }
}

// Test config is always available for integration tests
mod test_config;
pub use test_config::new_test_config;
