mod in_flight;
pub mod logger;

pub use in_flight::InFlightGuard;
pub use logger::{init_logger, LogContext, TimedOperation};
