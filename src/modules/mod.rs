pub mod cache;
pub mod catalog;
pub mod saved;
pub mod storage;
pub mod watch;
