//! Failover router
//!
//! Tries the ordered candidates one at a time until one answers. Every
//! outcome feeds the shared [`HealthTable`]; individual failures are only
//! surfaced, all together, when the candidates or the deadline run out.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use relay_domain::error::{
    AggregateFailure, Error, FailureRecord, ProviderError, Result, RoutingError,
};
use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::SharedEventSink;
use relay_domain::ports::providers::SharedGenerationProvider;
use relay_domain::value_objects::{
    GenerationOutput, GenerationRequest, GenerationResponse, HealthSummaryEntry, ProviderConfig,
    ProviderIdentity, deadline_after,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::health::HealthTable;
use super::ordering::{PriorityOrder, order_candidates};

/// A configured provider and the adapter serving it
#[derive(Clone)]
pub struct RoutedProvider {
    pub config: ProviderConfig,
    pub adapter: SharedGenerationProvider,
}

impl RoutedProvider {
    pub fn new(config: ProviderConfig, adapter: SharedGenerationProvider) -> Self {
        Self { config, adapter }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }
}

impl std::fmt::Debug for RoutedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutedProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Health-aware failover router
///
/// Holds no per-request state: concurrent `generate` calls share only the
/// health table and the priority order, both read through atomic snapshots.
pub struct Router {
    providers: BTreeMap<String, RoutedProvider>,
    priority: PriorityOrder,
    health: Arc<HealthTable>,
    events: SharedEventSink,
}

impl Router {
    /// Create a router over `providers`
    ///
    /// Every provider must already have a record in `health`, and its adapter
    /// must report the same name as its config.
    pub fn new(
        providers: Vec<RoutedProvider>,
        health: Arc<HealthTable>,
        events: SharedEventSink,
    ) -> Result<Self> {
        if providers.is_empty() {
            return Err(Error::configuration("Router needs at least one provider"));
        }

        let mut names = HashSet::new();
        for provider in &providers {
            if !names.insert(provider.name().to_string()) {
                return Err(Error::configuration(format!(
                    "Duplicate provider name '{}'",
                    provider.name()
                )));
            }
            let adapter_name = &provider.adapter.identity().name;
            if adapter_name != provider.name() {
                return Err(Error::configuration(format!(
                    "Provider '{}' is served by an adapter named '{adapter_name}'",
                    provider.name()
                )));
            }
            if !health.contains(provider.name()) {
                return Err(Error::internal(format!(
                    "Provider '{}' has no health record",
                    provider.name()
                )));
            }
        }

        let configs: Vec<ProviderConfig> = providers.iter().map(|p| p.config.clone()).collect();
        let priority = PriorityOrder::from_configs(&configs);
        let providers = providers
            .into_iter()
            .map(|p| (p.name().to_string(), p))
            .collect();

        Ok(Self {
            providers,
            priority,
            health,
            events,
        })
    }

    /// Resolve `request` against the ordered candidates
    ///
    /// Each attempt is bounded by the provider's own timeout and by the
    /// request deadline, whichever comes first. Once the deadline has passed
    /// no further candidate is tried.
    #[instrument(skip_all, fields(request_id = %request.request_id))]
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, RoutingError> {
        let snapshot = self.health.snapshot();
        let priority = self.priority.current();
        let candidates =
            order_candidates(&priority, &snapshot, request.provider_override.as_deref())?;
        debug!(?candidates, "Candidates ordered");

        let mut failures = Vec::new();
        let mut chain = Vec::with_capacity(candidates.len());

        if request.is_expired() {
            return Err(self.exhausted(request.request_id, failures, true));
        }

        for (attempt, name) in candidates.iter().enumerate() {
            let Some(provider) = self.providers.get(name) else {
                continue;
            };
            chain.push(name.clone());
            self.events.emit(RoutingEvent::AttemptStarted {
                request_id: request.request_id,
                provider: name.clone(),
                attempt,
            });

            let started = Instant::now();
            let outcome = Self::attempt(provider, &request, started).await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(output) => {
                    self.health.record_success(name, elapsed);
                    self.events.emit(RoutingEvent::RequestSucceeded {
                        request_id: request.request_id,
                        provider: name.clone(),
                        latency: elapsed,
                        attempts: chain.len(),
                    });
                    return Ok(GenerationResponse {
                        request_id: request.request_id,
                        content: output.content,
                        provider: provider.adapter.identity().clone(),
                        latency: elapsed,
                        usage: output.usage,
                        fallback_chain_used: chain,
                    });
                }
                Err(error) => {
                    warn!(provider = %name, kind = %error.kind, "Attempt failed: {}", error.message);
                    self.health.record_failure(name, &error);
                    self.events.emit(RoutingEvent::AttemptFailed {
                        request_id: request.request_id,
                        provider: name.clone(),
                        kind: error.kind,
                        message: error.message.clone(),
                        elapsed,
                    });
                    failures.push(FailureRecord::new(name.as_str(), &error));

                    if request.is_expired() && attempt + 1 < candidates.len() {
                        return Err(self.exhausted(request.request_id, failures, true));
                    }
                }
            }
        }

        let deadline_exceeded = request.is_expired();
        Err(self.exhausted(request.request_id, failures, deadline_exceeded))
    }

    async fn attempt(
        provider: &RoutedProvider,
        request: &GenerationRequest,
        started: Instant,
    ) -> std::result::Result<GenerationOutput, ProviderError> {
        let deadline = deadline_after(started, provider.config.timeout).min(request.deadline);
        let call = provider.adapter.generate(
            &request.prompt,
            request.system_prompt.as_deref(),
            deadline,
        );
        match tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(format!(
                "no response within {:?}",
                deadline.saturating_duration_since(started)
            ))),
        }
    }

    fn exhausted(
        &self,
        request_id: Uuid,
        failures: Vec<FailureRecord>,
        deadline_exceeded: bool,
    ) -> RoutingError {
        self.events.emit(RoutingEvent::RequestExhausted {
            request_id,
            attempts: failures.len(),
            deadline_exceeded,
        });
        RoutingError::Exhausted(AggregateFailure {
            request_id,
            failures,
            deadline_exceeded,
        })
    }

    /// Per-provider health summary for dashboards
    pub fn get_health_summary(&self) -> BTreeMap<String, HealthSummaryEntry> {
        self.health.summary()
    }

    /// Move `name` to the front of the static priority order
    pub fn set_primary_provider(&self, name: &str) -> Result<()> {
        let order = self.priority.set_primary(name)?;
        self.events.emit(RoutingEvent::PriorityChanged {
            order: order.to_vec(),
        });
        Ok(())
    }

    /// Move `name` to the back of the static priority order
    pub fn add_fallback_provider(&self, name: &str) -> Result<()> {
        let order = self.priority.add_fallback(name)?;
        self.events.emit(RoutingEvent::PriorityChanged {
            order: order.to_vec(),
        });
        Ok(())
    }

    /// Current static priority order
    pub fn priority_order(&self) -> Vec<String> {
        self.priority.current().to_vec()
    }

    /// The health table outcomes are recorded in
    pub fn health(&self) -> &Arc<HealthTable> {
        &self.health
    }

    /// Identities of every routed provider, in name order
    pub fn identities(&self) -> Vec<ProviderIdentity> {
        self.providers
            .values()
            .map(|p| p.adapter.identity().clone())
            .collect()
    }

    /// Adapters of every routed provider, in name order
    pub fn adapters(&self) -> Vec<SharedGenerationProvider> {
        self.providers
            .values()
            .map(|p| Arc::clone(&p.adapter))
            .collect()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
