//! Image decoding, frame artwork and per-image decode outcomes.

pub mod artwork;
pub mod decode;
pub mod raster;
pub mod table;
