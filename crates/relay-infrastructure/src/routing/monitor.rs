//! Background health probing
//!
//! The monitor pings every provider once per cycle, concurrently, and feeds
//! the outcomes into the [`HealthTable`]. Providers recover from `Unhealthy`
//! through probes even when no live traffic reaches them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use relay_domain::error::ProviderError;
use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::SharedEventSink;
use relay_domain::ports::providers::SharedGenerationProvider;
use relay_domain::value_objects::{HealthStatus, deadline_after};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::health::HealthTable;
use crate::config::HealthConfig;

/// Probe cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Time between the starts of consecutive cycles
    pub interval: Duration,
    /// Bound on each individual ping
    pub timeout: Duration,
}

impl From<&HealthConfig> for ProbeSettings {
    fn from(config: &HealthConfig) -> Self {
        Self {
            interval: config.probe_interval(),
            timeout: config.probe_timeout(),
        }
    }
}

/// Result of one probe cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Providers pinged
    pub probed: usize,
    /// Pings that succeeded
    pub succeeded: usize,
    /// Providers healthy once the cycle's outcomes were recorded
    pub healthy: usize,
    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

/// Pings providers and records the outcomes
pub struct HealthMonitor {
    table: Arc<HealthTable>,
    adapters: Vec<SharedGenerationProvider>,
    settings: ProbeSettings,
    events: SharedEventSink,
}

impl HealthMonitor {
    pub fn new(
        table: Arc<HealthTable>,
        adapters: Vec<SharedGenerationProvider>,
        settings: ProbeSettings,
        events: SharedEventSink,
    ) -> Self {
        Self {
            table,
            adapters,
            settings,
            events,
        }
    }

    /// The table this monitor feeds
    pub fn table(&self) -> &Arc<HealthTable> {
        &self.table
    }

    pub fn settings(&self) -> ProbeSettings {
        self.settings
    }

    /// Ping every provider once, concurrently
    pub async fn probe_once(&self) -> ProbeReport {
        let started = Instant::now();

        let outcomes = join_all(self.adapters.iter().map(|adapter| self.probe(adapter))).await;
        let succeeded = outcomes.iter().filter(|ok| **ok).count();

        let healthy = self
            .table
            .snapshot()
            .values()
            .filter(|record| record.status == HealthStatus::Healthy)
            .count();
        let report = ProbeReport {
            probed: outcomes.len(),
            succeeded,
            healthy,
            duration: started.elapsed(),
        };

        self.events.emit(RoutingEvent::ProbeCycleCompleted {
            probed: report.probed,
            healthy: report.healthy,
            duration: report.duration,
        });
        report
    }

    async fn probe(&self, adapter: &SharedGenerationProvider) -> bool {
        let name = adapter.identity().name.as_str();
        let started = Instant::now();
        let deadline = deadline_after(started, self.settings.timeout);

        let outcome = match tokio::time::timeout_at(
            tokio::time::Instant::from_std(deadline),
            adapter.ping(deadline),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(format!(
                "probe exceeded {:?}",
                self.settings.timeout
            ))),
        };

        match outcome {
            Ok(()) => {
                self.table.record_success(name, started.elapsed());
                true
            }
            Err(error) => {
                debug!(provider = %name, %error, "Probe failed");
                self.table.record_failure(name, &error);
                false
            }
        }
    }

    /// Run [`probe_once`](Self::probe_once) every `interval` until `cancel` fires
    ///
    /// The first cycle starts immediately. A cycle that overruns the interval
    /// delays the next one instead of bunching ticks. Cancellation also aborts
    /// a cycle in progress.
    pub fn spawn_probe_loop(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                providers = self.adapters.len(),
                interval = ?self.settings.interval,
                "Health probe loop started"
            );

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    () = cancel.cancelled() => break,
                    report = self.probe_once() => {
                        debug!(probed = report.probed, healthy = report.healthy, "Probe cycle done");
                    }
                }
            }

            info!("Health probe loop stopped");
        })
    }
}
