/// Shared application layer patterns
///
/// This module contains application-level abstractions used across
/// multiple modules.
pub mod pagination;

pub use pagination::*;
