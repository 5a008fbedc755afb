//! Saved items ("my list"), persisted through key/value storage.

pub mod application;
pub mod domain;

pub use application::{SavedItemsStore, SAVED_ITEMS_KEY};
pub use domain::{SavedRecord, Sluggable};
