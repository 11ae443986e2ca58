use crate::{
    assets::raster::Raster,
    foundation::error::{CutError, CutResult},
    foundation::math::unpremul_u8,
};

/// Decode encoded image bytes (PNG, JPEG, ...) into a straight RGBA8 raster.
pub fn decode_image(bytes: &[u8]) -> CutResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CutError::asset(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba8(width, height, rgba.into_raw())
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> CutResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts).map_err(|e| CutError::asset(format!("parse svg tree: {e}")))
}

/// Rasterize SVG artwork to `width` x `height` straight RGBA8.
///
/// The document is stretched to the target size, matching how raster artwork is drawn across the
/// full canvas.
pub fn rasterize_svg(bytes: &[u8], width: u32, height: u32) -> CutResult<Raster> {
    let tree = parse_svg(bytes)?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CutError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let mut straight = pixmap.data().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    Raster::from_rgba8(width, height, straight)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_u8(px[0], a);
        px[1] = unpremul_u8(px[1], a);
        px[2] = unpremul_u8(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
