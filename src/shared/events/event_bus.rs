use tokio::sync::broadcast;

use super::catalog_events::{CatalogEvent, DomainEvent};

const DEFAULT_CAPACITY: usize = 64;

/// In-process fan-out of catalog events to any number of view subscribers.
///
/// Publishing never blocks and never fails: with no subscribers the event is
/// dropped, and a lagging subscriber loses the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: CatalogEvent) {
        log::debug!("Event: {} ({})", event.event_type(), event.event_id());
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
