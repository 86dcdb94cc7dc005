//! Configuration for the processing pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for row processing and the recovery scan
///
/// # Examples
///
/// ```
/// use draftwire_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.rate_limit_ms, 1100);
/// assert_eq!(config.scan_interval_minutes, 60);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum interval between outbound generation calls (ms)
    /// Default: 1100 (≈55 requests/min under a 60/min quota)
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// How often the recovery scan runs (minutes)
    /// Default: 60
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u64,
}

fn default_rate_limit_ms() -> u64 {
    1100
}

fn default_scan_interval_minutes() -> u64 {
    60
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: default_rate_limit_ms(),
            scan_interval_minutes: default_scan_interval_minutes(),
        }
    }
}

impl PipelineConfig {
    /// Pacing interval as a duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// Scan interval as a duration
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_minutes * 60)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_limit_ms == 0 {
            return Err("rate_limit_ms must be greater than 0".to_string());
        }
        if self.scan_interval_minutes == 0 {
            return Err("scan_interval_minutes must be greater than 0".to_string());
        }
        Ok(())
    }
}
