//! Frame templates and contain-fit placement.

/// Static frame template table.
pub mod registry;
/// Contain-fit of an image inside a slot.
pub mod fit;
