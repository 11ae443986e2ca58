//! Print-unit conversions.

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;
/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Whole pixels covering `cm` centimetres at `dpi`.
pub fn cm_to_px(cm: f64, dpi: f64) -> u32 {
    let px = (cm * dpi / CM_PER_INCH).round();
    if px.is_finite() && px > 0.0 {
        px.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Unrounded pixel length of `mm` millimetres at `dpi`.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm / MM_PER_INCH * dpi
}

/// Millimetre length of `px` pixels at `dpi`.
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}

#[cfg(test)]
#[path = "../../tests/unit/export/units.rs"]
mod tests;
