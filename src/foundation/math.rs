use crate::foundation::core::{Point, Size, Vec2};

/// `Some(v)` when `v` is finite.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// `Some(p)` when both coordinates are finite.
pub fn finite_point(p: Point) -> Option<Point> {
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

/// `Some(v)` when both components are finite.
pub fn finite_vec(v: Vec2) -> Option<Vec2> {
    (v.x.is_finite() && v.y.is_finite()).then_some(v)
}

/// `Some(s)` when both dimensions are finite and strictly positive.
pub fn positive_size(s: Size) -> Option<Size> {
    (s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0).then_some(s)
}

pub(crate) fn mul_div255_u8(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
