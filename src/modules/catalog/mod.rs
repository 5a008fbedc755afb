//! Catalog listings: resource kinds, envelope parsing, paginated stores and
//! the HTTP client that feeds them.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{
    ports::CatalogFetcher, CatalogItem, LoadOptions, LoadOutcome, RelatedMoviesStore,
    ResourceStore, SearchStore, StoreState,
};
pub use domain::{Category, Filters, MovieItem, ResourceConfig, ResourcePage, TmdbInfo};
pub use infrastructure::RateLimitClient;
