mod filters;
mod resource_config;

pub use filters::Filters;
pub use resource_config::{ResourceConfig, StatusDiscriminator};
