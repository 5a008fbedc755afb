pub mod app;
pub mod modules;
pub mod shared;

pub use app::Catalog;
pub use modules::catalog::{Category, Filters, LoadOptions, MovieItem, ResourceStore, StoreState};
pub use modules::watch::{Episode, MovieDetail, Server, WatchSession};
pub use shared::{AppConfig, AppError, AppResult, CatalogEvent, CatalogEventKind, EventBus};
