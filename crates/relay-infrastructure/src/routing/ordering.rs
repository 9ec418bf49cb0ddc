//! Candidate ordering
//!
//! Health class decides first (healthy, degraded, unknown, unhealthy); the
//! static priority order breaks ties. A per-request override is the only way
//! to put a provider ahead of its health class.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use relay_domain::error::{Error, Result, RoutingError};
use relay_domain::value_objects::{HealthRecord, HealthStatus, ProviderConfig};

/// Order the providers to attempt for one request
///
/// `priority` lists every provider in static priority order. Providers missing
/// from `snapshot` rank as `Unknown`. The sort is stable, so providers of equal
/// health class keep their priority order.
pub fn order_candidates(
    priority: &[String],
    snapshot: &BTreeMap<String, HealthRecord>,
    provider_override: Option<&str>,
) -> std::result::Result<Vec<String>, RoutingError> {
    if let Some(name) = provider_override {
        if !priority.iter().any(|p| p == name) {
            return Err(RoutingError::UnknownProvider {
                name: name.to_string(),
            });
        }
    }

    let status_of = |name: &str| {
        snapshot
            .get(name)
            .map_or(HealthStatus::Unknown, |record| record.status)
    };

    let mut ranked: Vec<&String> = priority
        .iter()
        .filter(|name| Some(name.as_str()) != provider_override)
        .collect();
    ranked.sort_by_key(|name| status_of(name.as_str()).rank());

    let mut candidates = Vec::with_capacity(priority.len());
    if let Some(name) = provider_override {
        candidates.push(name.to_string());
    }
    candidates.extend(ranked.into_iter().cloned());
    Ok(candidates)
}

/// Static priority order, adjustable at runtime
///
/// Readers get the whole order with one atomic load; updates replace it.
pub struct PriorityOrder {
    order: ArcSwap<Vec<String>>,
}

impl PriorityOrder {
    /// Order providers by configured priority, ties in declaration order
    pub fn from_configs(configs: &[ProviderConfig]) -> Self {
        let mut sorted: Vec<&ProviderConfig> = configs.iter().collect();
        sorted.sort_by_key(|config| config.priority);
        Self::new(sorted.into_iter().map(|c| c.name().to_string()).collect())
    }

    /// Use `order` as given
    pub fn new(order: Vec<String>) -> Self {
        Self {
            order: ArcSwap::from_pointee(order),
        }
    }

    /// Current order
    pub fn current(&self) -> Arc<Vec<String>> {
        self.order.load_full()
    }

    /// Move `name` to the front; returns the new order
    pub fn set_primary(&self, name: &str) -> Result<Arc<Vec<String>>> {
        self.reposition(name, |order, entry| order.insert(0, entry))
    }

    /// Move `name` to the back; returns the new order
    pub fn add_fallback(&self, name: &str) -> Result<Arc<Vec<String>>> {
        self.reposition(name, Vec::push)
    }

    fn reposition<F>(&self, name: &str, place: F) -> Result<Arc<Vec<String>>>
    where
        F: Fn(&mut Vec<String>, String),
    {
        if !self.order.load().iter().any(|p| p == name) {
            return Err(Error::not_found(format!("provider '{name}'")));
        }
        self.order.rcu(|current| {
            let mut order: Vec<String> = current.iter().filter(|p| *p != name).cloned().collect();
            place(&mut order, name.to_string());
            order
        });
        Ok(self.current())
    }
}

impl std::fmt::Debug for PriorityOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PriorityOrder").field(&self.current()).finish()
    }
}
