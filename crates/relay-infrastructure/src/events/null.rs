use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::RoutingEventSink;

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl NullEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl RoutingEventSink for NullEventSink {
    fn emit(&self, _event: RoutingEvent) {}

    fn has_subscribers(&self) -> bool {
        false
    }
}
