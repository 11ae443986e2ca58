//! Shared primitives: geometry re-exports, colors, ids, errors and numeric guards.

pub mod core;
pub mod error;
pub mod math;
