use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::catalog::domain::MovieItem;
use crate::modules::watch::domain::MovieDetail;

/// Items that can be saved, keyed by their slug
pub trait Sluggable {
    fn slug(&self) -> &str;
}

impl Sluggable for MovieItem {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Sluggable for MovieDetail {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// An owned snapshot of a saved item, frozen at save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord<T> {
    pub slug: String,
    pub snapshot: T,
    pub saved_at: DateTime<Utc>,
}

impl<T: Sluggable + Clone> SavedRecord<T> {
    pub fn capture(item: &T) -> Self {
        Self {
            slug: item.slug().to_string(),
            snapshot: item.clone(),
            saved_at: Utc::now(),
        }
    }
}
