use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;
use tokio::time::Duration;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_PROBE_DELAY: Duration = Duration::from_secs(1);

// Parses a duration string (e.g., "3s", "250ms") into a `tokio::time::Duration`.
// Used for deserializing duration values from the config file.
fn parse_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Settings for a single URL check batch.
/// Corresponds to the [batch] section in the TOML config file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    // Upper bound for a single HEAD request.
    #[serde(default = "BatchConfig::default_timeout", deserialize_with = "parse_duration")]
    pub timeout: Duration,

    // Pause between two probes of the same batch.
    #[serde(default = "BatchConfig::default_delay", deserialize_with = "parse_duration")]
    pub delay: Duration,
}

impl BatchConfig {
    fn default_timeout() -> Duration {
        DEFAULT_PROBE_TIMEOUT
    }

    fn default_delay() -> Duration {
        DEFAULT_PROBE_DELAY
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            delay: Self::default_delay(),
        }
    }
}

/// Settings for the background job queue.
/// Corresponds to the [jobs] section in the TOML config file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JobsConfig {
    // Number of jobs that may run at the same time.
    #[serde(default = "JobsConfig::default_num_workers")]
    pub num_workers: usize,

    // Jobs that can wait in the queue before enqueue blocks.
    #[serde(default = "JobsConfig::default_queue_capacity")]
    pub queue_capacity: usize,

    // Finished jobs whose summaries stay available.
    #[serde(default = "JobsConfig::default_history_limit")]
    pub history_limit: usize,
}

impl JobsConfig {
    fn default_num_workers() -> usize {
        1
    }

    fn default_queue_capacity() -> usize {
        16
    }

    fn default_history_limit() -> usize {
        256
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            num_workers: Self::default_num_workers(),
            queue_capacity: Self::default_queue_capacity(),
            history_limit: Self::default_history_limit(),
        }
    }
}

/// Represents the overall application configuration, loaded from a TOML file.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub jobs: JobsConfig,
}

impl Config {
    pub fn new(config_path: &Path) -> Result<Self> {
        let config = Self::load_from_file(config_path)?;
        config.validate()?;
        Ok(config)
    }

    // Loads configuration from a TOML file.
    fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.batch.timeout.is_zero(), "batch.timeout must be greater than zero");
        ensure!(self.jobs.num_workers > 0, "jobs.num_workers must be at least 1");
        ensure!(self.jobs.queue_capacity > 0, "jobs.queue_capacity must be at least 1");
        ensure!(self.jobs.history_limit > 0, "jobs.history_limit must be at least 1");
        Ok(())
    }
}
