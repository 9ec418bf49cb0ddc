//! Routing event definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProviderErrorKind;
use crate::value_objects::HealthStatus;

/// Observable routing and health occurrences
///
/// Events carry provider names rather than adapter handles so they can be
/// serialized and shipped to dashboards unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingEvent {
    /// A provider's health class changed
    HealthTransition {
        /// Provider whose class changed
        provider: String,
        /// Class before the outcome
        from: HealthStatus,
        /// Class after the outcome
        to: HealthStatus,
        /// Consecutive failures after the outcome
        consecutive_failures: u32,
    },
    /// The router is about to call a provider
    AttemptStarted {
        request_id: Uuid,
        provider: String,
        /// Zero-based position in the candidate list
        attempt: usize,
    },
    /// A provider call failed
    AttemptFailed {
        request_id: Uuid,
        provider: String,
        kind: ProviderErrorKind,
        message: String,
        elapsed: Duration,
    },
    /// A request was satisfied
    RequestSucceeded {
        request_id: Uuid,
        provider: String,
        latency: Duration,
        /// Number of providers attempted, including the successful one
        attempts: usize,
    },
    /// Every candidate failed, or the deadline expired
    RequestExhausted {
        request_id: Uuid,
        attempts: usize,
        deadline_exceeded: bool,
    },
    /// A background probe cycle finished
    ProbeCycleCompleted {
        probed: usize,
        healthy: usize,
        duration: Duration,
    },
    /// An optional provider was left out of the active set
    ProviderDropped { provider: String, reason: String },
    /// The static priority order was changed at runtime
    PriorityChanged { order: Vec<String> },
}

impl RoutingEvent {
    /// Short snake_case name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            Self::HealthTransition { .. } => "health_transition",
            Self::AttemptStarted { .. } => "attempt_started",
            Self::AttemptFailed { .. } => "attempt_failed",
            Self::RequestSucceeded { .. } => "request_succeeded",
            Self::RequestExhausted { .. } => "request_exhausted",
            Self::ProbeCycleCompleted { .. } => "probe_cycle_completed",
            Self::ProviderDropped { .. } => "provider_dropped",
            Self::PriorityChanged { .. } => "priority_changed",
        }
    }

    /// Provider the event is about, if it names exactly one
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::HealthTransition { provider, .. }
            | Self::AttemptStarted { provider, .. }
            | Self::AttemptFailed { provider, .. }
            | Self::RequestSucceeded { provider, .. }
            | Self::ProviderDropped { provider, .. } => Some(provider),
            Self::RequestExhausted { .. }
            | Self::ProbeCycleCompleted { .. }
            | Self::PriorityChanged { .. } => None,
        }
    }
}
