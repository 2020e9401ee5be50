//! Application layer: storage seam, use cases, and error reporting.

pub mod error;
pub mod posts;
pub mod repos;
