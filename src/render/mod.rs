//! Scene assembly, text shaping and CPU rasterization.

/// `vello_cpu` rasterizer.
pub mod cpu;
pub mod stage;
/// Parley text layout.
pub mod text;
