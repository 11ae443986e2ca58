use std::sync::Arc;

use crate::{
    foundation::core::Size,
    foundation::error::{CutError, CutResult},
    foundation::math::mul_div255_u8,
};

/// Decoded raster in straight (non-premultiplied) RGBA8, row-major, tightly packed.
///
/// `readable == false` models a source whose pixels may be drawn but not read back, like a
/// cross-origin image loaded without CORS. Drawing never needs [`Raster::pixels`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    data: Arc<Vec<u8>>,
    readable: bool,
}

impl Raster {
    /// Wrap straight RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> CutResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CutError::validation("raster size overflow"))?;
        if data.len() != expected {
            return Err(CutError::validation(format!(
                "raster expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
            readable: true,
        })
    }

    /// Same pixels, marked as not readable.
    pub fn tainted(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Whether pixel read-back is permitted.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Natural size as floating point.
    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Read straight RGBA8 pixels.
    pub fn pixels(&self) -> CutResult<&[u8]> {
        if !self.readable {
            return Err(CutError::pixel_access(format!(
                "{}x{} raster is tainted",
                self.width, self.height
            )));
        }
        Ok(self.data.as_slice())
    }

    /// Premultiplied copy of the pixels for drawing. Available even for tainted rasters.
    pub(crate) fn to_premul_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.as_ref().clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            px[0] = mul_div255_u8(px[0], a);
            px[1] = mul_div255_u8(px[1], a);
            px[2] = mul_div255_u8(px[2], a);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
