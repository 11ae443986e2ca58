//! Pointer and wheel handling for placed images and text.

/// Input routing and gesture state.
pub mod dispatch;
/// Pure drag and zoom math.
pub mod transform;
