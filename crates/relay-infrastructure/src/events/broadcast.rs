//! Broadcast Event Sink
//!
//! Event sink using a tokio broadcast channel for in-process distribution.
//!
//! - Multiple subscribers
//! - Configurable channel capacity
//! - No persistence (events are ephemeral)
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use relay_infrastructure::events::BroadcastEventSink;
//!
//! let sink = BroadcastEventSink::new();
//! let mut events = sink.subscribe_stream();
//! // ... hand `sink` to the router ...
//! while let Some(event) = events.next().await {
//!     println!("{}", event.name());
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, stream};
use relay_domain::events::RoutingEvent;
use relay_domain::ports::infrastructure::RoutingEventSink;
use tokio::sync::broadcast;
use tracing::warn;

use crate::constants::EVENT_CHANNEL_CAPACITY;

/// Boxed stream of routing events
pub type RoutingEventStream = Pin<Box<dyn Stream<Item = RoutingEvent> + Send + 'static>>;

/// Event sink backed by a tokio broadcast channel
///
/// When a subscriber falls more than `capacity` events behind, its oldest
/// events are dropped; the stream logs the gap and continues.
#[derive(Clone)]
pub struct BroadcastEventSink {
    sender: Arc<broadcast::Sender<RoutingEvent>>,
    capacity: usize,
}

impl BroadcastEventSink {
    /// Create a sink with the default capacity (1024)
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Raw receiver of future events
    pub fn subscribe(&self) -> broadcast::Receiver<RoutingEvent> {
        self.sender.subscribe()
    }

    /// Stream of future events that skips over lag
    pub fn subscribe_stream(&self) -> RoutingEventStream {
        let receiver = self.sender.subscribe();
        let stream = stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Routing event stream lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Box::pin(stream)
    }

    /// Get the current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BroadcastEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastEventSink")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl RoutingEventSink for BroadcastEventSink {
    fn emit(&self, event: RoutingEvent) {
        // No receivers is not an error: the event is simply unobserved
        let _ = self.sender.send(event);
    }

    fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}
