//! Relay Bootstrap - composition root
//!
//! Wires validated provider configs to their adapters, the shared health
//! table, the router and the background probe loop.
//!
//! ```text
//! AppConfig → validate_providers → resolve_provider (linkme) → Router
//!                                                     ↓           ↑
//!                                               HealthMonitor → HealthTable
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let relay = init_relay(ConfigLoader::new().load()?).await?;
//! let response = relay.router().generate(relay.request("Hello")).await?;
//! relay.shutdown().await;
//! ```

use std::sync::Arc;

use relay_domain::error::{Error, Result};
use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::SharedEventSink;
use relay_domain::value_objects::GenerationRequest;
use relay_providers::resolve_provider;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::loader::validate_app_config;
use crate::config::{AppConfig, CredentialResolver, DroppedProvider, validate_providers};
use crate::events::{BroadcastEventSink, FanoutEventSink, RoutingEventStream, TracingEventSink};
use crate::routing::{HealthMonitor, HealthTable, ProbeSettings, RoutedProvider, Router};

/// A running relay: router, health monitor and probe loop
///
/// Dropping the relay cancels the probe loop; [`shutdown`](Self::shutdown)
/// also waits for it to finish.
pub struct Relay {
    config: Arc<AppConfig>,
    router: Arc<Router>,
    monitor: Arc<HealthMonitor>,
    broadcast: BroadcastEventSink,
    dropped: Vec<DroppedProvider>,
    cancel: CancellationToken,
    probe: Option<JoinHandle<()>>,
}

impl Relay {
    /// Configuration the relay was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The failover router
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// The health monitor (usable for on-demand probes)
    pub fn monitor(&self) -> &Arc<HealthMonitor> {
        &self.monitor
    }

    /// Optional providers left out at startup
    pub fn dropped(&self) -> &[DroppedProvider] {
        &self.dropped
    }

    /// Receiver of routing events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RoutingEvent> {
        self.broadcast.subscribe()
    }

    /// Stream of routing events emitted from now on
    pub fn subscribe_stream(&self) -> RoutingEventStream {
        self.broadcast.subscribe_stream()
    }

    /// A request carrying the configured default deadline
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(prompt).with_timeout(self.config.routing.default_deadline())
    }

    /// Whether the background probe loop is running
    pub fn is_probing(&self) -> bool {
        self.probe.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the probe loop and wait for it to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.probe.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Health probe loop ended abnormally");
            }
        }
        info!("Relay stopped");
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("router", &self.router)
            .field("dropped", &self.dropped)
            .field("probing", &self.probe.is_some())
            .finish_non_exhaustive()
    }
}

/// Build a relay from configuration
///
/// Credentials are resolved from the process environment. Adapters come from
/// the `relay-providers` registry, selected by each provider's configured
/// backend kind. Fails on any configuration error in a required provider.
pub async fn init_relay(config: AppConfig) -> Result<Relay> {
    info!("Initializing relay");
    validate_app_config(&config)?;

    let set = validate_providers(&config.providers, &CredentialResolver::from_env())?;
    let mut dropped = set.dropped;
    let mut providers = Vec::with_capacity(set.configs.len());

    for provider_config in set.configs {
        match resolve_provider(&provider_config) {
            Ok(adapter) => providers.push(RoutedProvider::new(provider_config, adapter)),
            Err(e) if provider_config.optional => {
                warn!(provider = provider_config.name(), error = %e, "Dropping optional provider");
                dropped.push(DroppedProvider {
                    name: provider_config.name().to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if providers.is_empty() {
        return Err(Error::configuration(
            "No provider adapter could be constructed",
        ));
    }

    assemble(config, providers, dropped)
}

/// Build a relay around already constructed providers
///
/// Skips provider validation and the adapter registry; scalar settings are
/// still validated.
pub async fn init_relay_with(config: AppConfig, providers: Vec<RoutedProvider>) -> Result<Relay> {
    validate_app_config(&config)?;
    assemble(config, providers, Vec::new())
}

fn assemble(
    config: AppConfig,
    providers: Vec<RoutedProvider>,
    dropped: Vec<DroppedProvider>,
) -> Result<Relay> {
    let broadcast = BroadcastEventSink::with_capacity(config.routing.event_channel_capacity);
    let events: SharedEventSink = Arc::new(FanoutEventSink::new(vec![
        Arc::new(TracingEventSink::new()),
        Arc::new(broadcast.clone()),
    ]));

    for provider in &dropped {
        events.emit(RoutingEvent::ProviderDropped {
            provider: provider.name.clone(),
            reason: provider.reason.clone(),
        });
    }

    let health = Arc::new(HealthTable::new(
        providers.iter().map(|p| p.name().to_string()),
        config.health.failure_threshold,
        Arc::clone(&events),
    ));
    let router = Arc::new(Router::new(providers, Arc::clone(&health), Arc::clone(&events))?);
    let monitor = Arc::new(HealthMonitor::new(
        health,
        router.adapters(),
        ProbeSettings::from(&config.health),
        events,
    ));

    let cancel = CancellationToken::new();
    let probe = config
        .health
        .probe_enabled
        .then(|| Arc::clone(&monitor).spawn_probe_loop(cancel.clone()));

    info!(
        providers = ?router.priority_order(),
        dropped = dropped.len(),
        probing = probe.is_some(),
        "Relay initialized"
    );

    Ok(Relay {
        config: Arc::new(config),
        router,
        monitor,
        broadcast,
        dropped,
        cancel,
        probe,
    })
}
