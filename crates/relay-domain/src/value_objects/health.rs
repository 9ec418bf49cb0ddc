//! Health value objects
//!
//! A [`HealthRecord`] is immutable: recording an outcome produces the next
//! record. The health table swaps records in as whole snapshots, so readers
//! never observe a half-updated entry.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Health class of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Last recorded outcome was a success
    Healthy,
    /// Failing, but below the unhealthy threshold
    Degraded,
    /// At or above the consecutive-failure threshold
    Unhealthy,
    /// No outcome recorded yet
    Unknown,
}

impl HealthStatus {
    /// Classify a consecutive-failure count against `threshold`
    ///
    /// `0` is healthy, `1..threshold` degraded, `threshold..` unhealthy. A
    /// threshold of `0` is treated as `1`.
    pub fn from_failures(consecutive_failures: u32, threshold: u32) -> Self {
        let threshold = threshold.max(1);
        if consecutive_failures == 0 {
            Self::Healthy
        } else if consecutive_failures >= threshold {
            Self::Unhealthy
        } else {
            Self::Degraded
        }
    }

    /// Position in candidate ordering (lower is tried first)
    pub fn rank(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Degraded => 1,
            Self::Unknown => 2,
            Self::Unhealthy => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health state of one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub total_checks: u64,
    pub total_failures: u64,
    pub last_check: Option<DateTime<Utc>>,
    pub last_error: Option<ProviderError>,
    pub last_latency: Option<Duration>,
}

impl Default for HealthRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthRecord {
    /// Initial record: unknown, nothing recorded
    pub fn new() -> Self {
        Self {
            status: HealthStatus::Unknown,
            consecutive_failures: 0,
            total_checks: 0,
            total_failures: 0,
            last_check: None,
            last_error: None,
            last_latency: None,
        }
    }

    /// The record that follows a success observed at `at`
    ///
    /// Recovery is immediate: failures reset to zero and the status becomes
    /// healthy whatever the history.
    pub fn after_success(&self, latency: Duration, at: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            consecutive_failures: 0,
            total_checks: self.total_checks + 1,
            total_failures: self.total_failures,
            last_check: Some(at),
            last_error: None,
            last_latency: Some(latency),
        }
    }

    /// The record that follows a failure observed at `at`
    pub fn after_failure(&self, error: &ProviderError, threshold: u32, at: DateTime<Utc>) -> Self {
        let consecutive_failures = self.consecutive_failures.saturating_add(1);
        Self {
            status: HealthStatus::from_failures(consecutive_failures, threshold),
            consecutive_failures,
            total_checks: self.total_checks + 1,
            total_failures: self.total_failures + 1,
            last_check: Some(at),
            last_error: Some(error.clone()),
            last_latency: self.last_latency,
        }
    }

    /// Dashboard view of this record as of `now`
    pub fn summarize(&self, now: DateTime<Utc>) -> HealthSummaryEntry {
        HealthSummaryEntry {
            status: self.status,
            consecutive_failures: self.consecutive_failures,
            last_check_age: self
                .last_check
                .and_then(|checked| (now - checked).to_std().ok()),
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }
}

/// Per-provider entry of the health summary read by dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummaryEntry {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    /// Time since the last recorded outcome; `None` if never checked
    pub last_check_age: Option<Duration>,
    pub last_error: Option<String>,
}
