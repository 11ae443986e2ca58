use crate::{
    foundation::core::{Point, Size, Vec2},
    foundation::math::positive_size,
    layout::registry::Slot,
};

/// "Contain" placement of an image inside a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainFit {
    /// Unscaled display size of the image.
    pub display: Size,
    /// Offset from the slot's top-left that centers `display` in the slot.
    pub centering: Vec2,
}

impl ContainFit {
    /// Top-left render position for an image carrying `offset` relative to the centered fit.
    pub fn origin(&self, slot: &Slot, offset: Vec2) -> Point {
        slot.origin() + self.centering + offset
    }

    /// Display size multiplied by `scale`.
    pub fn scaled(&self, scale: f64) -> Size {
        Size::new(self.display.width * scale, self.display.height * scale)
    }
}

/// Fit an image of `natural` size inside `slot` without cropping or distortion.
///
/// Returns `None` when either size is zero, negative or non-finite (e.g. before decode completes).
pub fn contain_fit(slot: Size, natural: Size) -> Option<ContainFit> {
    let slot = positive_size(slot)?;
    let natural = positive_size(natural)?;

    let image_aspect = natural.width / natural.height;
    let slot_aspect = slot.width / slot.height;

    let display = if image_aspect > slot_aspect {
        Size::new(slot.width, slot.width / image_aspect)
    } else {
        Size::new(slot.height * image_aspect, slot.height)
    };

    let centering = Vec2::new(
        (slot.width - display.width) * 0.5,
        (slot.height - display.height) * 0.5,
    );
    Some(ContainFit { display, centering })
}

/// [`contain_fit`] for a registry slot.
pub fn fit_in_slot(slot: &Slot, natural: Size) -> Option<ContainFit> {
    contain_fit(slot.size(), natural)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
