//! Print-resolution PNG export.

pub mod resolution;
pub mod session;
pub mod units;
