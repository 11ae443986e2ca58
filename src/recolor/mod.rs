//! Frame-artwork recoloring and the color palette.

pub mod engine;
pub mod palette;
