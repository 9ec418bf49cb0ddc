//! Health table
//!
//! Holds exactly one [`HealthRecord`] per configured provider. The whole map
//! lives behind an [`ArcSwap`]: readers take one atomic load and get an
//! internally consistent snapshot, writers build the next map and publish it
//! with a compare-and-swap retry loop. No lock is held across an await.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::Utc;
use relay_domain::error::ProviderError;
use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::SharedEventSink;
use relay_domain::value_objects::{HealthRecord, HealthStatus, HealthSummaryEntry};
use tracing::{debug, warn};

/// Immutable view of every provider's health at one instant
pub type HealthSnapshot = Arc<BTreeMap<String, HealthRecord>>;

/// Health records of the configured providers
pub struct HealthTable {
    records: ArcSwap<BTreeMap<String, HealthRecord>>,
    failure_threshold: u32,
    events: SharedEventSink,
}

impl HealthTable {
    /// Create a table with an `Unknown` record for each provider
    ///
    /// The set of providers is fixed for the lifetime of the table.
    pub fn new<I, S>(providers: I, failure_threshold: u32, events: SharedEventSink) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = providers
            .into_iter()
            .map(|name| (name.into(), HealthRecord::new()))
            .collect();
        Self {
            records: ArcSwap::from_pointee(records),
            failure_threshold: failure_threshold.max(1),
            events,
        }
    }

    /// Record a successful call or probe
    pub fn record_success(&self, provider: &str, latency: Duration) {
        let now = Utc::now();
        self.update(provider, |record| record.after_success(latency, now));
    }

    /// Record a failed call or probe
    pub fn record_failure(&self, provider: &str, error: &ProviderError) {
        let now = Utc::now();
        let threshold = self.failure_threshold;
        self.update(provider, |record| record.after_failure(error, threshold, now));
    }

    /// Consistent snapshot of all records
    pub fn snapshot(&self) -> HealthSnapshot {
        self.records.load_full()
    }

    /// Current record of `provider`
    pub fn get(&self, provider: &str) -> Option<HealthRecord> {
        self.records.load().get(provider).cloned()
    }

    /// Current status of `provider`
    pub fn status(&self, provider: &str) -> Option<HealthStatus> {
        self.records.load().get(provider).map(|record| record.status)
    }

    /// Whether `provider` has a record
    pub fn contains(&self, provider: &str) -> bool {
        self.records.load().contains_key(provider)
    }

    /// Provider names, in name order
    pub fn providers(&self) -> Vec<String> {
        self.records.load().keys().cloned().collect()
    }

    /// Dashboard summary of every provider
    pub fn summary(&self) -> BTreeMap<String, HealthSummaryEntry> {
        let now = Utc::now();
        self.records
            .load()
            .iter()
            .map(|(name, record)| (name.clone(), record.summarize(now)))
            .collect()
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    fn update<F>(&self, provider: &str, next: F)
    where
        F: Fn(&HealthRecord) -> HealthRecord,
    {
        if !self.contains(provider) {
            warn!(%provider, "Ignoring health outcome for unknown provider");
            return;
        }

        let previous = self.records.rcu(|current| {
            let mut updated = BTreeMap::clone(current);
            if let Some(record) = updated.get_mut(provider) {
                *record = next(record);
            }
            updated
        });

        // `next` is pure, so replaying it on the record we replaced yields the record we stored
        let Some(before) = previous.get(provider) else {
            return;
        };
        let after = next(before);
        debug!(
            %provider,
            status = %after.status,
            consecutive_failures = after.consecutive_failures,
            "Health recorded"
        );
        if before.status != after.status {
            self.events.emit(RoutingEvent::HealthTransition {
                provider: provider.to_string(),
                from: before.status,
                to: after.status,
                consecutive_failures: after.consecutive_failures,
            });
        }
    }
}

impl std::fmt::Debug for HealthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthTable")
            .field("records", &self.snapshot())
            .field("failure_threshold", &self.failure_threshold)
            .finish_non_exhaustive()
    }
}
