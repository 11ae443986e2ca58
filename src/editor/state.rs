//! Immutable editor snapshot.
//!
//! Every mutation returns a fresh [`EditorState`]; collections are shared `Arc<[T]>` slices that
//! are rebuilt on write, so a reader holding an older snapshot keeps a consistent view.

use std::sync::Arc;

use crate::{
    foundation::core::{ImageId, Point, TextId, Vec2},
    foundation::error::{CutError, CutResult},
    foundation::math::{finite, finite_point},
    interact::transform::{TransformPatch, scale_from_percent},
    layout::registry::{FrameLayout, FrameType, layout},
};

/// Frame color before the user picks one.
pub const DEFAULT_FRAME_COLOR: &str = "#ffffff";

/// Slot-relative transform of a placed image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageTransform {
    /// Horizontal offset from the centered contain placement.
    pub offset_x: f64,
    /// Vertical offset from the centered contain placement.
    pub offset_y: f64,
    /// Horizontal scale. Always equal to `scale_y` in practice.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

impl ImageTransform {
    /// Offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

/// A user image placed in a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedImage {
    pub id: ImageId,
    pub slot_id: String,
    pub transform: ImageTransform,
}

/// Text styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
    /// Hex color.
    pub color: String,
    pub italic: bool,
    /// One glyph per line, top to bottom.
    pub vertical: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 32.0,
            font_family: String::new(),
            color: "#000000".to_string(),
            italic: false,
            vertical: false,
        }
    }
}

/// A text overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub id: TextId,
    pub text: String,
    /// Anchor in canvas space.
    pub position: Point,
    pub style: TextStyle,
}

/// Per-field text update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub italic: Option<bool>,
    pub vertical: Option<bool>,
}

/// Current single selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
    Image(ImageId),
    Text(TextId),
}

/// Every way editor state may change.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    SelectFrame(Option<FrameType>),
    InsertImage { slot_id: String },
    DeleteImage(ImageId),
    ApplyTransform { id: ImageId, patch: TransformPatch },
    SetScalePercent(f64),
    InsertText { text: String, style: TextStyle },
    MoveText { id: TextId, position: Point },
    UpdateText { id: TextId, patch: TextPatch },
    DeleteText(TextId),
    Select(Option<Selection>),
    SelectSlot(Option<String>),
    SetFrameColor(String),
}

/// A new state plus the image ids whose decoded pixels must be released.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: EditorState,
    pub released: Vec<ImageId>,
    /// Id created by an insert, if any.
    pub created: Option<Created>,
}

/// Identifier created by an insert message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Created {
    Image(ImageId),
    Text(TextId),
}

impl Transition {
    fn keep(state: EditorState) -> Self {
        Self {
            state,
            released: Vec::new(),
            created: None,
        }
    }
}

/// Immutable editor snapshot.
#[derive(Clone, Debug)]
pub struct EditorState {
    frame: Option<FrameType>,
    frame_color: String,
    images: Arc<[PlacedImage]>,
    texts: Arc<[TextItem]>,
    selection: Option<Selection>,
    selected_slot: Option<String>,
    next_id: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            frame: None,
            frame_color: DEFAULT_FRAME_COLOR.to_string(),
            images: Arc::from(Vec::new()),
            texts: Arc::from(Vec::new()),
            selection: None,
            selected_slot: None,
            next_id: 1,
        }
    }
}

impl EditorState {
    /// Empty state with no frame selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<FrameType> {
        self.frame
    }

    /// Layout of the selected frame.
    pub fn layout(&self) -> Option<&'static FrameLayout> {
        self.frame.map(layout)
    }

    pub fn frame_color(&self) -> &str {
        &self.frame_color
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn texts(&self) -> &[TextItem] {
        &self.texts
    }

    /// Shared handle to the image collection; identity changes on every image mutation.
    pub fn images_handle(&self) -> &Arc<[PlacedImage]> {
        &self.images
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected_slot(&self) -> Option<&str> {
        self.selected_slot.as_deref()
    }

    pub fn image(&self, id: ImageId) -> Option<&PlacedImage> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn image_in_slot(&self, slot_id: &str) -> Option<&PlacedImage> {
        self.images.iter().find(|i| i.slot_id == slot_id)
    }

    pub fn text(&self, id: TextId) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Apply one message.
    ///
    /// Unknown ids and non-finite values are silent no-ops; structural misuse (unknown slot,
    /// no frame) is an error.
    pub fn reduce(&self, msg: Message) -> CutResult<Transition> {
        Ok(match msg {
            Message::SelectFrame(frame) => self.select_frame(frame),
            Message::InsertImage { slot_id } => self.insert_image(&slot_id)?,
            Message::DeleteImage(id) => self.delete_image(id),
            Message::ApplyTransform { id, patch } => {
                Transition::keep(self.apply_transform(id, patch))
            }
            Message::SetScalePercent(v) => Transition::keep(self.set_scale_percent(v)),
            Message::InsertText { text, style } => {
                let (state, id) = self.insert_text(text, style)?;
                Transition {
                    state,
                    released: Vec::new(),
                    created: Some(Created::Text(id)),
                }
            }
            Message::MoveText { id, position } => Transition::keep(self.move_text(id, position)),
            Message::UpdateText { id, patch } => Transition::keep(self.update_text(id, patch)),
            Message::DeleteText(id) => Transition::keep(self.delete_text(id)),
            Message::Select(sel) => Transition::keep(self.select(sel)),
            Message::SelectSlot(slot) => Transition::keep(self.select_slot(slot)),
            Message::SetFrameColor(hex) => Transition::keep(self.set_frame_color(hex)),
        })
    }

    /// Switch frames. Any change clears images, selection and slot selection. Text and a text
    /// selection are cleared even when the frame stays the same.
    pub fn select_frame(&self, frame: Option<FrameType>) -> Transition {
        let mut next = self.clone();
        next.texts = Arc::from(Vec::new());
        if matches!(next.selection, Some(Selection::Text(_))) {
            next.selection = None;
        }
        if frame == self.frame {
            return Transition::keep(next);
        }

        let released = self.images.iter().map(|i| i.id).collect();
        next.frame = frame;
        next.images = Arc::from(Vec::new());
        next.selection = None;
        next.selected_slot = None;
        Transition {
            state: next,
            released,
            created: None,
        }
    }

    /// Place a new image in `slot_id`, replacing whatever was there.
    pub fn insert_image(&self, slot_id: &str) -> CutResult<Transition> {
        let layout = self.layout().ok_or(CutError::NoFrameSelected)?;
        let slot = layout.slot(slot_id).ok_or_else(|| {
            CutError::validation(format!(
                "slot '{slot_id}' does not exist in frame '{}'",
                layout.frame_type
            ))
        })?;

        let id = ImageId(self.next_id);
        let mut released = Vec::new();
        let mut images: Vec<PlacedImage> = Vec::with_capacity(self.images.len() + 1);
        for img in self.images.iter() {
            if img.slot_id == slot.id {
                released.push(img.id);
            } else {
                images.push(img.clone());
            }
        }
        images.push(PlacedImage {
            id,
            slot_id: slot.id.to_string(),
            transform: ImageTransform::default(),
        });

        let mut next = self.clone();
        next.next_id += 1;
        next.images = Arc::from(images);
        if let Some(Selection::Image(sel)) = next.selection {
            if released.contains(&sel) {
                next.selection = None;
            }
        }
        Ok(Transition {
            state: next,
            released,
            created: Some(Created::Image(id)),
        })
    }

    /// Remove an image and release its pixels.
    pub fn delete_image(&self, id: ImageId) -> Transition {
        if self.image(id).is_none() {
            return Transition::keep(self.clone());
        }
        let mut next = self.clone();
        next.images = self.images.iter().filter(|i| i.id != id).cloned().collect();
        if next.selection == Some(Selection::Image(id)) {
            next.selection = None;
        }
        Transition {
            state: next,
            released: vec![id],
            created: None,
        }
    }

    /// Commit the finite fields of `patch` to image `id`.
    pub fn apply_transform(&self, id: ImageId, patch: TransformPatch) -> Self {
        let patch = patch.finite_only();
        if patch.is_empty() || self.image(id).is_none() {
            if !patch.is_empty() {
                tracing::debug!(image = %id, "transform for unknown image ignored");
            }
            return self.clone();
        }
        let mut next = self.clone();
        next.images = self
            .images
            .iter()
            .map(|i| {
                if i.id == id {
                    PlacedImage {
                        transform: patch.apply(i.transform),
                        ..i.clone()
                    }
                } else {
                    i.clone()
                }
            })
            .collect();
        next
    }

    /// Set the selected slot's image scale from the percent-like numeric input.
    pub fn set_scale_percent(&self, input: f64) -> Self {
        let Some(scale) = scale_from_percent(input) else {
            tracing::debug!("non-finite scale input discarded");
            return self.clone();
        };
        match self.selected_slot().and_then(|s| self.image_in_slot(s)) {
            Some(img) => self.apply_transform(img.id, TransformPatch::scale(scale)),
            None => self.clone(),
        }
    }

    /// Add a text item at the frame's default text position.
    pub fn insert_text(&self, text: String, style: TextStyle) -> CutResult<(Self, TextId)> {
        let layout = self.layout().ok_or(CutError::NoFrameSelected)?;
        let id = TextId(self.next_id);
        let mut texts = self.texts.to_vec();
        texts.push(TextItem {
            id,
            text,
            position: layout.default_text_position(),
            style,
        });
        let mut next = self.clone();
        next.next_id += 1;
        next.texts = Arc::from(texts);
        Ok((next, id))
    }

    /// Move a text item. Non-finite positions are discarded.
    pub fn move_text(&self, id: TextId, position: Point) -> Self {
        let Some(position) = finite_point(position) else {
            tracing::debug!(text = %id, "non-finite text position discarded");
            return self.clone();
        };
        self.map_text(id, |t| TextItem {
            position,
            ..t.clone()
        })
    }

    /// Update text content or style.
    pub fn update_text(&self, id: TextId, patch: TextPatch) -> Self {
        self.map_text(id, |t| {
            let mut out = t.clone();
            if let Some(s) = &patch.text {
                out.text.clone_from(s);
            }
            if let Some(size) = patch.font_size.and_then(finite).filter(|v| *v > 0.0) {
                out.style.font_size = size;
            }
            if let Some(f) = &patch.font_family {
                out.style.font_family.clone_from(f);
            }
            if let Some(c) = &patch.color {
                out.style.color.clone_from(c);
            }
            if let Some(v) = patch.italic {
                out.style.italic = v;
            }
            if let Some(v) = patch.vertical {
                out.style.vertical = v;
            }
            out
        })
    }

    /// Remove a text item.
    pub fn delete_text(&self, id: TextId) -> Self {
        let mut next = self.clone();
        next.texts = self.texts.iter().filter(|t| t.id != id).cloned().collect();
        if next.selection == Some(Selection::Text(id)) {
            next.selection = None;
        }
        next
    }

    pub fn select(&self, selection: Option<Selection>) -> Self {
        let mut next = self.clone();
        next.selection = selection;
        next
    }

    pub fn select_slot(&self, slot: Option<String>) -> Self {
        let mut next = self.clone();
        next.selected_slot = slot;
        next
    }

    /// Store the frame color as given; unparsable values fall back to the plain artwork at
    /// render time.
    pub fn set_frame_color(&self, hex: String) -> Self {
        let mut next = self.clone();
        next.frame_color = hex;
        next
    }

    fn map_text(&self, id: TextId, f: impl Fn(&TextItem) -> TextItem) -> Self {
        if self.text(id).is_none() {
            return self.clone();
        }
        let mut next = self.clone();
        next.texts = self
            .texts
            .iter()
            .map(|t| if t.id == id { f(t) } else { t.clone() })
            .collect();
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/state.rs"]
mod tests;
