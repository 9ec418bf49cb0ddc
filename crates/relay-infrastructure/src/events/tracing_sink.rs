//! Tracing event sink
//!
//! Renders routing events as structured `tracing` events under the
//! `relay::events` target. Failures and health degradation log at `warn`,
//! everything else at `info` or `debug`.

use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::RoutingEventSink;
use relay_domain::value_objects::HealthStatus;
use tracing::{debug, info, warn};

/// Sink that writes events to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl RoutingEventSink for TracingEventSink {
    fn emit(&self, event: RoutingEvent) {
        match event {
            RoutingEvent::HealthTransition {
                provider,
                from,
                to,
                consecutive_failures,
            } => {
                if matches!(to, HealthStatus::Degraded | HealthStatus::Unhealthy) {
                    warn!(target: "relay::events", %provider, %from, %to, consecutive_failures, "Provider health degraded");
                } else {
                    info!(target: "relay::events", %provider, %from, %to, consecutive_failures, "Provider health changed");
                }
            }
            RoutingEvent::AttemptStarted {
                request_id,
                provider,
                attempt,
            } => {
                debug!(target: "relay::events", %request_id, %provider, attempt, "Attempting provider");
            }
            RoutingEvent::AttemptFailed {
                request_id,
                provider,
                kind,
                message,
                elapsed,
            } => {
                warn!(target: "relay::events", %request_id, %provider, %kind, ?elapsed, %message, "Provider attempt failed");
            }
            RoutingEvent::RequestSucceeded {
                request_id,
                provider,
                latency,
                attempts,
            } => {
                info!(target: "relay::events", %request_id, %provider, ?latency, attempts, "Request served");
            }
            RoutingEvent::RequestExhausted {
                request_id,
                attempts,
                deadline_exceeded,
            } => {
                warn!(target: "relay::events", %request_id, attempts, deadline_exceeded, "All providers failed");
            }
            RoutingEvent::ProbeCycleCompleted {
                probed,
                healthy,
                duration,
            } => {
                debug!(target: "relay::events", probed, healthy, ?duration, "Probe cycle completed");
            }
            RoutingEvent::ProviderDropped { provider, reason } => {
                warn!(target: "relay::events", %provider, %reason, "Optional provider dropped");
            }
            RoutingEvent::PriorityChanged { order } => {
                info!(target: "relay::events", ?order, "Provider priority changed");
            }
        }
    }
}
