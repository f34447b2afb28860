//! Configuration for the handlewatch scanner.

use std::time::Duration;

use serde::Deserialize;

use handlewatch_core::error::{HandlewatchError, Result};
use handlewatch_probe::{ProbeSettings, MODULE_NAMES};

use crate::scoring::ScoringConfig;

/// Top-level scan configuration.
///
/// Loaded from the `[scan]` section of `handlewatch.toml` or
/// `HANDLEWATCH_SCAN__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Maximum probe modules running at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Overall deadline for scanning one handle, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-request transport timeout, in seconds. Capped by the scan deadline.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent for platforms that reject non-browser clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Enabled probe modules, by registry key.
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_max_concurrency() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    ProbeSettings::default().user_agent
}

fn default_modules() -> Vec<String> {
    MODULE_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            modules: default_modules(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl ScanConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(HandlewatchError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HandlewatchError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(HandlewatchError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.modules.is_empty() {
            return Err(HandlewatchError::Config(
                "at least one probe module must be enabled".to_string(),
            ));
        }
        self.scoring.validate()
    }
}

/// Load the scan config from `{file_prefix}.toml` (optional) and the
/// environment, falling back to defaults when no `[scan]` section exists.
pub fn load_scan_config(file_prefix: &str) -> Result<ScanConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("HANDLEWATCH")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scan.modules")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| HandlewatchError::Config(e.to_string()))?;

    match cfg.get::<ScanConfig>("scan") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(ScanConfig::default()),
        Err(e) => Err(HandlewatchError::Config(e.to_string())),
    }
}
