//! Shared fixtures: routers over scripted providers

use std::sync::Arc;
use std::time::Duration;

use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::SharedEventSink;
use relay_domain::ports::providers::{GenerationProvider, SharedGenerationProvider};
use relay_domain::value_objects::{BackendKind, ProviderConfig};
use relay_infrastructure::events::BroadcastEventSink;
use relay_infrastructure::routing::{HealthTable, RoutedProvider, Router};
use relay_providers::generation::MockProvider;
use tokio::sync::broadcast;

pub const THRESHOLD: u32 = 3;

pub struct Fixture {
    pub router: Router,
    pub health: Arc<HealthTable>,
    pub mocks: Vec<Arc<MockProvider>>,
    pub events: broadcast::Receiver<RoutingEvent>,
    pub sink: SharedEventSink,
}

impl Fixture {
    pub fn mock(&self, name: &str) -> &Arc<MockProvider> {
        self.mocks
            .iter()
            .find(|m| m.identity().name == name)
            .expect("fixture provider")
    }

    /// Drain buffered events
    pub fn drain_events(&mut self) -> Vec<RoutingEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Drive `name` to unhealthy by recording failures directly
    pub fn make_unhealthy(&self, name: &str) {
        let error = relay_domain::ProviderError::unavailable("down");
        for _ in 0..THRESHOLD {
            self.health.record_failure(name, &error);
        }
    }
}

/// Provider config with priority by position and a generous timeout
pub fn mock_config(name: &str, priority: u32) -> ProviderConfig {
    ProviderConfig::new(name, BackendKind::Mock, "mock")
        .with_priority(priority)
        .with_timeout(Duration::from_secs(5))
}

/// Router over mock providers, prioritized in the order given
pub fn fixture(names: &[&str]) -> Fixture {
    let configs = names
        .iter()
        .zip(1u32..)
        .map(|(name, priority)| mock_config(name, priority))
        .collect();
    fixture_with(configs)
}

/// Router over mock providers with explicit configs
pub fn fixture_with(configs: Vec<ProviderConfig>) -> Fixture {
    let broadcast = BroadcastEventSink::new();
    let events = broadcast.subscribe();
    let sink: SharedEventSink = Arc::new(broadcast);

    let mocks: Vec<Arc<MockProvider>> = configs
        .iter()
        .map(|config| Arc::new(MockProvider::with_identity(config.identity.clone())))
        .collect();
    let providers = configs
        .iter()
        .zip(&mocks)
        .map(|(config, mock)| {
            let adapter: SharedGenerationProvider = Arc::clone(mock) as SharedGenerationProvider;
            RoutedProvider::new(config.clone(), adapter)
        })
        .collect();

    let health = Arc::new(HealthTable::new(
        configs.iter().map(|c| c.name().to_string()),
        THRESHOLD,
        Arc::clone(&sink),
    ));
    let router = Router::new(providers, Arc::clone(&health), Arc::clone(&sink))
        .expect("router should build");

    Fixture {
        router,
        health,
        mocks,
        events,
        sink,
    }
}
