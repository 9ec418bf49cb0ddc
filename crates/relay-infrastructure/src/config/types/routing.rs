//! Routing configuration types

use std::time::Duration;

use relay_domain::constants::DEFAULT_REQUEST_DEADLINE_SECS;
use serde::{Deserialize, Serialize};

use crate::constants::EVENT_CHANNEL_CAPACITY;

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Deadline applied to requests that do not carry their own, in seconds
    pub default_deadline_secs: u64,

    /// Buffered events per broadcast subscriber
    pub event_channel_capacity: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_deadline_secs: DEFAULT_REQUEST_DEADLINE_SECS,
            event_channel_capacity: EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl RoutingConfig {
    pub fn default_deadline(&self) -> Duration {
        Duration::from_secs(self.default_deadline_secs)
    }
}
