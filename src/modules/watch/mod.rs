//! Watch page: movie detail loading and the server/episode state machine.

pub mod application;
pub mod domain;

pub use application::{WatchState, WatchStore};
pub use domain::{Episode, MovieDetail, Server, SessionState, WatchSession};
