use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::{RoutingEventSink, SharedEventSink};

/// Forwards each event to every inner sink, in order
#[derive(Clone, Default)]
pub struct FanoutEventSink {
    sinks: Vec<SharedEventSink>,
}

impl FanoutEventSink {
    pub fn new(sinks: Vec<SharedEventSink>) -> Self {
        Self { sinks }
    }

    /// Add a sink
    pub fn push(&mut self, sink: SharedEventSink) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RoutingEventSink for FanoutEventSink {
    fn emit(&self, event: RoutingEvent) {
        let listening: Vec<&SharedEventSink> =
            self.sinks.iter().filter(|s| s.has_subscribers()).collect();
        if let Some((last, rest)) = listening.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }

    fn has_subscribers(&self) -> bool {
        self.sinks.iter().any(|s| s.has_subscribers())
    }
}
