//! Domain constants
//!
//! Defaults referenced by both the configuration layer and the routing engine.

// ============================================================================
// HEALTH MONITORING
// ============================================================================

/// Consecutive failures after which a provider is classified as unhealthy
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Interval between background probe cycles (seconds)
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;

/// Dedicated timeout for a single probe call (seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Prompt sent by the background probe loop
pub const PROBE_PROMPT: &str = "ping";

// ============================================================================
// REQUEST HANDLING
// ============================================================================

/// Per-call timeout applied when a provider block omits `timeout_secs`
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Overall deadline applied to requests built without an explicit one (seconds)
pub const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 60;

/// Upper bound on any configured timeout, deadline or probe interval (seconds)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Priority assigned to provider blocks without an explicit `priority`
pub const DEFAULT_PROVIDER_PRIORITY: u32 = 100;
