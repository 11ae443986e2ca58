//! Pure transform math for placed images.
//!
//! Nothing here touches editor state. Every function takes plain values and returns `None` when
//! any intermediate goes non-finite, so a caller can simply skip the update.

use crate::{
    editor::state::ImageTransform,
    foundation::core::{Affine, Point, Size, Vec2},
    foundation::math::{finite, finite_point, finite_vec},
    layout::fit::ContainFit,
    layout::registry::Slot,
};

/// Multiplicative step applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;
/// Scale never drops below this.
pub const MIN_SCALE: f64 = 0.1;

/// Region the image's top-left may occupy.
///
/// The image may be moved until it just touches its slot from outside on either axis; it does
/// not have to cover the slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    /// Smallest allowed top-left.
    pub min: Point,
    /// Largest allowed top-left.
    pub max: Point,
}

impl Envelope {
    /// `[slot.x - scaled.width, slot.x + slot.width]` by
    /// `[slot.y - scaled.height, slot.y + slot.height]`.
    pub fn for_slot(slot: &Slot, scaled: Size) -> Self {
        Self {
            min: Point::new(slot.x - scaled.width, slot.y - scaled.height),
            max: Point::new(slot.x + slot.width, slot.y + slot.height),
        }
    }

    /// Nearest point inside the envelope.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(self.min.x).min(self.max.x),
            p.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Whether `p` lies inside the envelope (bounds inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Node transform of an image drawn at `origin`: translate, then rotate (degrees), then scale.
pub fn image_affine(origin: Point, rotation_deg: f64, scale: f64) -> Affine {
    Affine::translate(origin.to_vec2())
        * Affine::rotate(rotation_deg.to_radians())
        * Affine::scale(scale)
}

/// Next on-screen top-left while dragging.
///
/// `grab` is the pointer position minus the image's top-left at pointer-down.
pub fn drag_position(pointer: Point, grab: Vec2, envelope: &Envelope) -> Option<Point> {
    let pointer = finite_point(pointer)?;
    let grab = finite_vec(grab)?;
    finite_point(envelope.clamp(pointer - grab))
}

/// Convert an on-screen top-left back to the slot-relative offset.
pub fn commit_offset(position: Point, slot: &Slot, fit: &ContainFit) -> Option<Vec2> {
    let position = finite_point(position)?;
    finite_vec(position - slot.origin() - fit.centering)
}

/// Everything a wheel step needs to know.
#[derive(Clone, Copy, Debug)]
pub struct WheelInput<'a> {
    /// Owning slot.
    pub slot: &'a Slot,
    /// Current contain fit of the image in its slot.
    pub fit: ContainFit,
    /// Current committed transform.
    pub transform: ImageTransform,
    /// Pointer in canvas space, if known.
    pub pointer: Option<Point>,
    /// Vertical wheel delta; negative scrolls up and zooms in.
    pub delta_y: f64,
}

/// Result of one wheel step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomOutcome {
    /// New uniform scale.
    pub scale: f64,
    /// New slot-relative offset.
    pub offset: Vec2,
    /// New on-screen top-left.
    pub position: Point,
}

impl ZoomOutcome {
    /// The outcome as a commit.
    pub fn patch(&self) -> TransformPatch {
        TransformPatch {
            offset_x: Some(self.offset.x),
            offset_y: Some(self.offset.y),
            scale: Some(self.scale),
            rotation: None,
        }
    }
}

/// Zoom anchored at the pointer.
///
/// The pointer is mapped into the image's local pre-scale space, the scale is stepped, and the
/// origin is recomputed so the same local point sits under the pointer again. Without a pointer
/// the image center is the anchor. The new origin is then clamped by the slot envelope.
pub fn wheel_zoom(input: WheelInput<'_>) -> Option<ZoomOutcome> {
    let delta = finite(input.delta_y)?;
    let old_scale = finite(input.transform.scale_x)?;
    let rotation = finite(input.transform.rotation)?;

    let origin = input.fit.origin(input.slot, finite_vec(input.transform.offset())?);
    let node = image_affine(origin, rotation, old_scale);

    let (local, pointer) = match input.pointer.and_then(finite_point) {
        Some(p) => {
            if node.determinant().abs() < f64::EPSILON {
                return None;
            }
            (node.inverse() * p, p)
        }
        None => {
            let center = Point::new(
                input.fit.display.width * 0.5,
                input.fit.display.height * 0.5,
            );
            (center, node * center)
        }
    };

    let stepped = if delta < 0.0 {
        old_scale * ZOOM_STEP
    } else {
        old_scale / ZOOM_STEP
    };
    let scale = stepped.max(MIN_SCALE);

    let anchored = Affine::rotate(rotation.to_radians()) * Affine::scale(scale) * local;
    let unclamped = Point::new(pointer.x - anchored.x, pointer.y - anchored.y);
    let envelope = Envelope::for_slot(input.slot, input.fit.scaled(scale));
    let position = finite_point(envelope.clamp(finite_point(unclamped)?))?;
    let offset = commit_offset(position, input.slot, &input.fit)?;

    Some(ZoomOutcome {
        scale,
        offset,
        position,
    })
}

/// Scale from the percent-like numeric input: `max(0.1, input / 10)`.
pub fn scale_from_percent(input: f64) -> Option<f64> {
    finite(input).map(|v| (v / 10.0).max(MIN_SCALE))
}

/// Per-field transform update. Fields left `None` are untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformPatch {
    /// New horizontal offset.
    pub offset_x: Option<f64>,
    /// New vertical offset.
    pub offset_y: Option<f64>,
    /// New uniform scale (sets both axes).
    pub scale: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
}

impl TransformPatch {
    /// Offset-only patch.
    pub fn offset(offset: Vec2) -> Self {
        Self {
            offset_x: Some(offset.x),
            offset_y: Some(offset.y),
            ..Self::default()
        }
    }

    /// Scale-only patch.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Same patch with every non-finite field dropped.
    pub fn finite_only(self) -> Self {
        Self {
            offset_x: self.offset_x.and_then(finite),
            offset_y: self.offset_y.and_then(finite),
            scale: self.scale.and_then(finite),
            rotation: self.rotation.and_then(finite),
        }
    }

    /// Whether nothing would change.
    pub fn is_empty(&self) -> bool {
        self.offset_x.is_none()
            && self.offset_y.is_none()
            && self.scale.is_none()
            && self.rotation.is_none()
    }

    /// Apply the finite fields of this patch to `t`.
    pub fn apply(self, t: ImageTransform) -> ImageTransform {
        let p = self.finite_only();
        let mut out = t;
        if let Some(v) = p.offset_x {
            out.offset_x = v;
        }
        if let Some(v) = p.offset_y {
            out.offset_y = v;
        }
        if let Some(v) = p.scale {
            out.scale_x = v;
            out.scale_y = v;
        }
        if let Some(v) = p.rotation {
            out.rotation = v;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/transform.rs"]
mod tests;
