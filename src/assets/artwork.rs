use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::{decode_image, rasterize_svg},
    assets::raster::Raster,
    foundation::error::{CutError, CutResult},
    layout::registry::FrameLayout,
};

/// Cross-origin mode for artwork fetches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossOrigin {
    /// Anonymous CORS request; keeps the raster readable for recoloring.
    Anonymous,
}

/// How a host should fetch frame artwork.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtworkRequest {
    /// Asset URL with a cache-busting query.
    pub url: String,
    /// Cross-origin mode.
    pub cross_origin: CrossOrigin,
}

/// Request for `layout`'s artwork, cache-busted with `nonce`.
pub fn artwork_request(layout: &FrameLayout, nonce: u64) -> ArtworkRequest {
    ArtworkRequest {
        url: format!("/{}?v={nonce}", layout.artwork.trim_start_matches('/')),
        cross_origin: CrossOrigin::Anonymous,
    }
}

/// Loaded frame artwork, keyed by its source path.
#[derive(Clone, Debug)]
pub struct Artwork {
    /// Source path as referenced by the layout.
    pub source: String,
    /// Decoded pixels at canvas size or natural size.
    pub raster: Arc<Raster>,
}

/// Read `layout`'s artwork from `root`. SVG artwork is rasterized at canvas size.
pub fn read_artwork(root: &Path, layout: &FrameLayout) -> CutResult<Artwork> {
    let path = resolve_artwork_path(root, layout.artwork);
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read frame artwork '{}'", path.display()))?;

    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    let raster = if is_svg {
        rasterize_svg(&bytes, layout.canvas.width, layout.canvas.height)?
    } else {
        decode_image(&bytes)?
    };

    Ok(Artwork {
        source: layout.artwork.to_string(),
        raster: Arc::new(raster),
    })
}

/// [`read_artwork`] with failures absorbed: a missing or broken artwork means the frame layer is
/// simply not drawn.
pub fn load_artwork(root: &Path, layout: &FrameLayout) -> Option<Artwork> {
    match read_artwork(root, layout) {
        Ok(a) => Some(a),
        Err(err) => {
            tracing::warn!(
                frame = %layout.frame_type,
                error = %err,
                "frame artwork unavailable; drawing without frame layer"
            );
            None
        }
    }
}

fn resolve_artwork_path(root: &Path, artwork: &str) -> PathBuf {
    let rel = artwork.split('?').next().unwrap_or(artwork);
    root.join(rel.trim_start_matches('/'))
}

/// Whether a MIME type is acceptable for image intake.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|p| p.eq_ignore_ascii_case("image/"))
        && mime.trim().len() > 6
}

/// Reject non-image MIME types at intake.
pub fn check_image_mime(mime: &str) -> CutResult<()> {
    if is_image_mime(mime) {
        Ok(())
    } else {
        Err(CutError::validation(format!("'{mime}' is not an image type")))
    }
}

/// MIME type implied by a file's extension, as a file picker would report it.
pub fn mime_for_path(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/artwork.rs"]
mod tests;
