//! Print-size driven export resolution.

use crate::{
    export::units::cm_to_px,
    foundation::error::{CutError, CutResult},
    layout::registry::{FrameType, Orientation},
};

/// Print resolution shared with the downstream printer.
pub const PRINT_DPI: f64 = 1200.0;
/// Long edge of the 10 x 15 cm print.
pub const PRINT_LONG_EDGE_CM: f64 = 15.0;
/// Short edge of the 10 x 15 cm print.
pub const PRINT_SHORT_EDGE_CM: f64 = 10.0;
/// Mobile exports never rasterize above this multiplier.
pub const MOBILE_MAX_PIXEL_RATIO: f64 = 3.0;

/// Coarse device class; only decides the pixel-ratio cap and delivery.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Classify a browser user agent (`Mobi`, `Android`, `iPhone`, `iPad`, `iPod`, any case).
    pub fn from_user_agent(ua: &str) -> Self {
        const MARKERS: [&str; 5] = ["mobi", "android", "iphone", "ipad", "ipod"];
        let ua = ua.to_ascii_lowercase();
        if MARKERS.iter().any(|m| ua.contains(m)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

/// Derived export parameters. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ExportTarget {
    pub frame_type: FrameType,
    pub orientation: Orientation,
    /// Physical print width.
    pub width_cm: f64,
    /// Physical print height.
    pub height_cm: f64,
    pub dpi: f64,
    /// Pixel width the print needs.
    pub target_width_px: u32,
    /// Multiplier from stage pixels to export pixels, after any device cap.
    pub pixel_ratio: f64,
    /// Whether the device cap lowered the ratio.
    pub capped: bool,
}

/// Resolve the export pixel ratio for `frame_type` drawn `stage_width` pixels wide.
#[tracing::instrument]
pub fn resolve_export_target(
    frame_type: FrameType,
    stage_width: f64,
    device: DeviceClass,
) -> CutResult<ExportTarget> {
    if !stage_width.is_finite() || stage_width <= 0.0 {
        return Err(CutError::validation(format!(
            "stage width must be finite and > 0, got {stage_width}"
        )));
    }

    let orientation = frame_type.orientation();
    let (width_cm, height_cm) = match orientation {
        Orientation::Horizontal => (PRINT_LONG_EDGE_CM, PRINT_SHORT_EDGE_CM),
        Orientation::Vertical => (PRINT_SHORT_EDGE_CM, PRINT_LONG_EDGE_CM),
    };
    let target_width_px = cm_to_px(width_cm, PRINT_DPI);
    let raw_ratio = f64::from(target_width_px) / stage_width;
    let (pixel_ratio, capped) = if device.is_mobile() && raw_ratio > MOBILE_MAX_PIXEL_RATIO {
        (MOBILE_MAX_PIXEL_RATIO, true)
    } else {
        (raw_ratio, false)
    };

    Ok(ExportTarget {
        frame_type,
        orientation,
        width_cm,
        height_cm,
        dpi: PRINT_DPI,
        target_width_px,
        pixel_ratio,
        capped,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/resolution.rs"]
mod tests;
