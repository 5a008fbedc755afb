pub mod ports;
mod related_store;
mod resource_store;
mod search_store;
mod store_state;

pub use related_store::{RelatedMoviesStore, DEFAULT_RELATED_LIMIT};
pub use resource_store::{CatalogItem, LoadOptions, LoadOutcome, ResourceStore};
pub use search_store::{SearchStore, DEFAULT_SUGGESTION_LIMIT};
pub use store_state::{LoadMode, StoreAction, StoreState};
