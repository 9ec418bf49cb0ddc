//! Health tracking configuration types

use std::time::Duration;

use relay_domain::constants::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_PROBE_INTERVAL_SECS, DEFAULT_PROBE_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};

/// Health configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Consecutive failures at which a provider becomes unhealthy
    pub failure_threshold: u32,

    /// Run the background probe loop
    pub probe_enabled: bool,

    /// Seconds between probe cycles
    pub probe_interval_secs: u64,

    /// Per-provider timeout of a probe, in seconds
    pub probe_timeout_secs: u64,
}

/// Returns default health configuration with:
/// - unhealthy after 3 consecutive failures
/// - a probe cycle every 30 seconds, each ping bounded by 10 seconds
impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            probe_enabled: true,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl HealthConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
