/// Outbound notifications for the view layer
///
/// Stores publish these after their state has already been updated, so a
/// subscriber reacting to an event always observes the new snapshot.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::domain::ResourceKind;

/// Base trait for all catalog events
pub trait DomainEvent: Send + Sync {
    /// When the event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Unique identifier for this event
    fn event_id(&self) -> Uuid;

    /// Type of event (for routing)
    fn event_type(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEventKind {
    /// A store moved to another page; views scroll to their list anchor
    PageChanged { kind: ResourceKind, page: u32 },
    /// A fetch failed; the store kept its previous items
    FetchFailed { kind: ResourceKind, message: String },
    /// The watch session selected another episode
    EpisodeChanged {
        slug: String,
        server_index: usize,
        episode_index: usize,
        stream_url: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: CatalogEventKind,
}

impl CatalogEvent {
    pub fn new(kind: CatalogEventKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            kind,
        }
    }

    pub fn page_changed(kind: ResourceKind, page: u32) -> Self {
        Self::new(CatalogEventKind::PageChanged { kind, page })
    }

    pub fn fetch_failed(kind: ResourceKind, message: impl Into<String>) -> Self {
        Self::new(CatalogEventKind::FetchFailed {
            kind,
            message: message.into(),
        })
    }

    pub fn episode_changed(
        slug: impl Into<String>,
        server_index: usize,
        episode_index: usize,
        stream_url: Option<String>,
    ) -> Self {
        Self::new(CatalogEventKind::EpisodeChanged {
            slug: slug.into(),
            server_index,
            episode_index,
            stream_url,
        })
    }
}

impl DomainEvent for CatalogEvent {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    fn event_id(&self) -> Uuid {
        self.event_id
    }

    fn event_type(&self) -> &'static str {
        match self.kind {
            CatalogEventKind::PageChanged { .. } => "PageChanged",
            CatalogEventKind::FetchFailed { .. } => "FetchFailed",
            CatalogEventKind::EpisodeChanged { .. } => "EpisodeChanged",
        }
    }
}
