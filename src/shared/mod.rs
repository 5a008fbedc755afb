// Shared kernel used by every module

pub mod application; // Pagination model
pub mod config; // Environment-driven configuration
pub mod domain; // Shared value objects
pub mod errors; // Shared error types
pub mod events; // Outbound notifications to the view layer
pub mod utils; // Logging helpers

pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use events::{CatalogEvent, CatalogEventKind, EventBus};
