mod watch_store;

pub use watch_store::{WatchState, WatchStore};
