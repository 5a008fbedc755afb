pub mod entities;
pub mod services;
pub mod value_objects;

// Re-exports for easy access
pub use entities::*;
pub use services::{catalog_queries, parse_page};
pub use value_objects::{Filters, ResourceConfig, StatusDiscriminator};
