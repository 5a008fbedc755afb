mod saved_items_store;

pub use saved_items_store::{SavedItemsStore, SAVED_ITEMS_KEY};
