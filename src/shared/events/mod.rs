mod catalog_events;
mod event_bus;

pub use catalog_events::{CatalogEvent, CatalogEventKind, DomainEvent};
pub use event_bus::EventBus;
