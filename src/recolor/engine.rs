use std::sync::Arc;

use crate::{
    assets::artwork::Artwork,
    assets::raster::Raster,
    foundation::core::{Rgb8, parse_hex_color},
};

/// Alpha must exceed this for a pixel to count as paintable.
pub const PAINTABLE_MIN_ALPHA: u8 = 10;
/// Each of R, G and B must be at least this for a pixel to count as paintable.
pub const PAINTABLE_MIN_CHANNEL: u8 = 245;

/// Near-white, visible pixels are the paintable frame surface.
#[inline]
pub fn is_paintable(px: [u8; 4]) -> bool {
    px[3] > PAINTABLE_MIN_ALPHA
        && px[0] >= PAINTABLE_MIN_CHANNEL
        && px[1] >= PAINTABLE_MIN_CHANNEL
        && px[2] >= PAINTABLE_MIN_CHANNEL
}

/// Replace RGB of every paintable pixel with `color`, keeping alpha.
pub fn substitute_in_place(rgba: &mut [u8], color: Rgb8) {
    for px in rgba.chunks_exact_mut(4) {
        if is_paintable([px[0], px[1], px[2], px[3]]) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }
}

/// Recolor the paintable area of `artwork` with `hex`.
///
/// Returns `None` when the color does not parse or the artwork pixels cannot be read; callers
/// then draw the unmodified artwork. The input raster is never modified.
#[tracing::instrument(skip(artwork), fields(width = artwork.width, height = artwork.height))]
pub fn recolor_near_white(artwork: &Raster, hex: &str) -> Option<Raster> {
    let Some(color) = parse_hex_color(hex) else {
        tracing::debug!("recolor skipped: unparsable color");
        return None;
    };
    let pixels = match artwork.pixels() {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(error = %err, "recolor skipped");
            return None;
        }
    };

    let mut out = pixels.to_vec();
    substitute_in_place(&mut out, color);
    Raster::from_rgba8(artwork.width, artwork.height, out).ok()
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RecolorKey {
    artwork: String,
    color: String,
}

/// Single-entry memo of the recolored frame keyed by `(artwork, color)`.
#[derive(Clone, Debug, Default)]
pub struct RecolorCache {
    entry: Option<(RecolorKey, Option<Arc<Raster>>)>,
    computations: u64,
}

impl RecolorCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recolored artwork for `(artwork, hex)`, recomputed only when either input changed.
    ///
    /// `None` means "no processed image"; draw `artwork.raster` instead.
    pub fn processed(&mut self, artwork: &Artwork, hex: &str) -> Option<Arc<Raster>> {
        let key = RecolorKey {
            artwork: artwork.source.clone(),
            color: normalize_color_key(hex),
        };
        if let Some((cached_key, cached)) = &self.entry {
            if *cached_key == key {
                return cached.clone();
            }
        }

        self.computations += 1;
        let result = recolor_near_white(&artwork.raster, hex).map(Arc::new);
        self.entry = Some((key, result.clone()));
        result
    }

    /// Forget the cached result.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times the substitution actually ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

fn normalize_color_key(hex: &str) -> String {
    match parse_hex_color(hex) {
        Some(c) => c.to_hex(),
        None => hex.trim().to_ascii_lowercase(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/engine.rs"]
mod tests;
