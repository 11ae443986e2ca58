//! Scene assembly and hit testing.
//!
//! [`build_scene`] turns a read-only editor snapshot into an ordered display list plus hit
//! regions. It never mutates editor state; intended changes flow back through the dispatcher.

use std::sync::Arc;

use crate::{
    assets::raster::Raster,
    assets::table::{DecodeStatus, DecodeTable},
    editor::state::{EditorState, PlacedImage, Selection, TextStyle},
    foundation::core::{Affine, Canvas, ImageId, Point, Rect, Size, Vec2},
    foundation::error::{CutError, CutResult},
    interact::dispatch::{Dispatcher, HitTarget, ImageGeometry},
    interact::transform::image_affine,
    layout::fit::fit_in_slot,
    layout::registry::{FrameLayout, Orientation, Slot},
    render::text::{TextBlock, TextEngine},
};

const SELECTION_COLOR: Rgba8 = Rgba8::new(0x3b, 0x82, 0xf6, 0xff);
const GUIDE_COLOR: Rgba8 = Rgba8::new(0x94, 0xa3, 0xb8, 0xb0);
const PLACEHOLDER_FILL: Rgba8 = Rgba8::new(0, 0, 0, 0x0d);
const LABEL_COLOR: &str = "#6b7280";
const LABEL_FONT_SIZE: f64 = 14.0;
const OUTLINE_WIDTH: f64 = 2.0;
const TEXT_OUTLINE_PAD: f64 = 4.0;
/// Horizontal shear applied to italic text.
const ITALIC_SHEAR: f64 = -0.2;

/// On-screen presentation of a layout's canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    pub layout: &'static FrameLayout,
    /// Display width in screen pixels.
    pub display_width: f64,
}

impl Stage {
    pub fn new(layout: &'static FrameLayout, display_width: f64) -> CutResult<Self> {
        if !display_width.is_finite() || display_width <= 0.0 {
            return Err(CutError::validation(format!(
                "stage display width must be finite and > 0, got {display_width}"
            )));
        }
        Ok(Self {
            layout,
            display_width,
        })
    }

    /// Screen pixels per canvas unit.
    pub fn scale(&self) -> f64 {
        self.display_width / f64::from(self.layout.canvas.width)
    }

    /// Display size in screen pixels.
    pub fn display_size(&self) -> Size {
        let s = self.scale();
        let c = self.layout.canvas.size();
        Size::new(c.width * s, c.height * s)
    }

    /// Map a screen point on the stage to canvas space.
    pub fn to_canvas(&self, screen: Point) -> Point {
        let s = self.scale();
        Point::new(screen.x / s, screen.y / s)
    }
}

/// Straight RGBA8 color for scene primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fixed z-order layers, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Images,
    Frame,
    Guide,
    Text,
    SlotInteraction,
}

/// One drawing primitive in canvas space.
#[derive(Clone, Debug)]
pub enum SceneItem {
    PushClip(Rect),
    PopClip,
    /// Raster drawn over `(0, 0, width, height)` under `transform`.
    Image {
        raster: Arc<Raster>,
        transform: Affine,
    },
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    StrokeRect {
        rect: Rect,
        color: Rgba8,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba8,
        width: f64,
    },
    Text {
        block: TextBlock,
        transform: Affine,
    },
}

#[derive(Clone, Debug)]
pub struct SceneEntry {
    pub layer: Layer,
    pub item: SceneItem,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Ordered display list plus hit regions in priority order.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub entries: Vec<SceneEntry>,
    pub hits: Vec<HitRegion>,
}

impl Scene {
    fn push(&mut self, layer: Layer, item: SceneItem) {
        self.entries.push(SceneEntry { layer, item });
    }

    /// Entries of one layer, in draw order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &SceneItem> {
        self.entries
            .iter()
            .filter(move |e| e.layer == layer)
            .map(|e| &e.item)
    }

    /// First hit region containing `p`, else the bare stage.
    pub fn hit_test(&self, p: Point) -> HitTarget {
        self.hits
            .iter()
            .find(|h| h.rect.contains(p))
            .map_or(HitTarget::Stage, |h| h.target)
    }
}

/// Per-slot status shown in the interaction layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Empty,
    Loading,
    Failed,
    Ready(ImageId),
}

impl SlotStatus {
    /// Status label for slots without a drawable image.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Empty => Some("click to add image"),
            Self::Loading => Some("loading"),
            Self::Failed => Some("load failed"),
            Self::Ready(_) => None,
        }
    }
}

/// Status of `slot` given the current state and decode table.
pub fn slot_status(state: &EditorState, decoded: &DecodeTable, slot: &Slot) -> SlotStatus {
    let Some(img) = state.image_in_slot(slot.id) else {
        return SlotStatus::Empty;
    };
    match decoded.status(img.id) {
        DecodeStatus::Ready(_) => SlotStatus::Ready(img.id),
        DecodeStatus::Pending => SlotStatus::Loading,
        DecodeStatus::Failed | DecodeStatus::Released => SlotStatus::Failed,
    }
}

/// Geometry of a decoded image in its slot. `None` while pending, broken or unplaced.
pub fn image_geometry(
    layout: &'static FrameLayout,
    state: &EditorState,
    decoded: &DecodeTable,
    id: ImageId,
) -> Option<ImageGeometry> {
    let img = state.image(id)?;
    let slot = layout.slot(&img.slot_id)?;
    let DecodeStatus::Ready(raster) = decoded.status(id) else {
        return None;
    };
    let fit = fit_in_slot(slot, raster.natural_size())?;
    Some(ImageGeometry {
        slot,
        fit,
        transform: img.transform,
    })
}

/// Everything the scene is derived from.
#[derive(Clone, Copy)]
pub struct SceneInputs<'a> {
    pub layout: &'static FrameLayout,
    pub state: &'a EditorState,
    pub decoded: &'a DecodeTable,
    /// Recolored artwork when available, otherwise the original; `None` omits the frame layer.
    pub frame: Option<&'a Arc<Raster>>,
    /// Source of uncommitted drag positions.
    pub dispatcher: Option<&'a Dispatcher>,
    /// Hide every editing-only decoration.
    pub export_mode: bool,
}

/// Build the display list in fixed layer order.
pub fn build_scene(inputs: &SceneInputs<'_>, text: &mut TextEngine) -> Scene {
    let layout = inputs.layout;
    let mut scene = Scene {
        canvas: layout.canvas,
        entries: Vec::new(),
        hits: Vec::new(),
    };

    push_images(&mut scene, inputs);

    if let Some(frame) = inputs.frame {
        let canvas = layout.canvas.size();
        let transform = Affine::scale_non_uniform(
            canvas.width / f64::from(frame.width.max(1)),
            canvas.height / f64::from(frame.height.max(1)),
        );
        scene.push(
            Layer::Frame,
            SceneItem::Image {
                raster: Arc::clone(frame),
                transform,
            },
        );
    }

    if !inputs.export_mode {
        push_guide(&mut scene, layout);
    }

    let text_hits = push_texts(&mut scene, inputs, text);
    let (empty_hits, occupied_hits) = push_slot_interaction(&mut scene, inputs, text);

    scene.hits.extend(empty_hits);
    scene.hits.extend(text_hits.into_iter().rev());
    scene.hits.extend(occupied_hits);
    scene
}

fn push_images(scene: &mut Scene, inputs: &SceneInputs<'_>) {
    for slot in inputs.layout.slots {
        let Some(img) = inputs.state.image_in_slot(slot.id) else {
            continue;
        };
        let DecodeStatus::Ready(raster) = inputs.decoded.status(img.id) else {
            continue;
        };
        let Some(transform) = image_transform(slot, img, raster, inputs.dispatcher) else {
            tracing::debug!(image = %img.id, "image skipped: degenerate geometry");
            continue;
        };
        scene.push(Layer::Images, SceneItem::PushClip(slot.rect()));
        scene.push(
            Layer::Images,
            SceneItem::Image {
                raster: Arc::new(raster.clone()),
                transform,
            },
        );
        scene.push(Layer::Images, SceneItem::PopClip);
    }
}

fn image_transform(
    slot: &Slot,
    img: &PlacedImage,
    raster: &Raster,
    dispatcher: Option<&Dispatcher>,
) -> Option<Affine> {
    let natural = raster.natural_size();
    let fit = fit_in_slot(slot, natural)?;
    let origin = dispatcher
        .and_then(|d| d.live_image_position(img.id))
        .unwrap_or_else(|| fit.origin(slot, img.transform.offset()));
    let node = image_affine(origin, img.transform.rotation, img.transform.scale_x);
    let to_display = Affine::scale_non_uniform(
        fit.display.width / natural.width,
        fit.display.height / natural.height,
    );
    let t = node * to_display;
    t.as_coeffs().iter().all(|c| c.is_finite()).then_some(t)
}

fn push_guide(scene: &mut Scene, layout: &FrameLayout) {
    let size = layout.canvas.size();
    let (from, to) = match layout.orientation() {
        Orientation::Horizontal => (
            Point::new(size.width * 0.5, 0.0),
            Point::new(size.width * 0.5, size.height),
        ),
        Orientation::Vertical => (
            Point::new(0.0, size.height * 0.5),
            Point::new(size.width, size.height * 0.5),
        ),
    };
    scene.push(
        Layer::Guide,
        SceneItem::Line {
            from,
            to,
            color: GUIDE_COLOR,
            width: 1.0,
        },
    );
}

fn push_texts(
    scene: &mut Scene,
    inputs: &SceneInputs<'_>,
    engine: &mut TextEngine,
) -> Vec<HitRegion> {
    let mut hits = Vec::new();
    for item in inputs.state.texts() {
        let block = match engine.layout(&item.text, &item.style) {
            Ok(b) => b,
            Err(err) => {
                tracing::debug!(text = %item.id, error = %err, "text skipped");
                continue;
            }
        };
        let anchor = inputs
            .dispatcher
            .and_then(|d| d.live_text_position(item.id))
            .unwrap_or(item.position);
        // Anchor is the top-center of the block.
        let top_left = anchor - Vec2::new(block.size.width * 0.5, 0.0);
        let bounds = Rect::from_origin_size(top_left, block.size);
        let transform = Affine::translate(top_left.to_vec2()) * italic_shear(&block);

        let selected = inputs.state.selection() == Some(Selection::Text(item.id));
        scene.push(Layer::Text, SceneItem::Text { block, transform });
        if selected && !inputs.export_mode {
            scene.push(
                Layer::Text,
                SceneItem::StrokeRect {
                    rect: bounds.inflate(TEXT_OUTLINE_PAD, TEXT_OUTLINE_PAD),
                    color: SELECTION_COLOR,
                    width: OUTLINE_WIDTH,
                },
            );
        }
        hits.push(HitRegion {
            rect: bounds,
            target: HitTarget::Text(item.id),
        });
    }
    hits
}

fn italic_shear(block: &TextBlock) -> Affine {
    if !block.italic {
        return Affine::IDENTITY;
    }
    let mid = block.size.height * 0.5;
    Affine::translate((0.0, mid)) * Affine::skew(ITALIC_SHEAR, 0.0) * Affine::translate((0.0, -mid))
}

fn push_slot_interaction(
    scene: &mut Scene,
    inputs: &SceneInputs<'_>,
    engine: &mut TextEngine,
) -> (Vec<HitRegion>, Vec<HitRegion>) {
    let mut empty = Vec::new();
    let mut occupied = Vec::new();
    let selected_slot = inputs.state.selected_slot();

    for slot in inputs.layout.slots {
        let rect = slot.rect();
        let status = slot_status(inputs.state, inputs.decoded, slot);
        match status {
            SlotStatus::Ready(id) => {
                if selected_slot == Some(slot.id) && !inputs.export_mode {
                    scene.push(
                        Layer::SlotInteraction,
                        SceneItem::StrokeRect {
                            rect,
                            color: SELECTION_COLOR,
                            width: OUTLINE_WIDTH,
                        },
                    );
                }
                occupied.push(HitRegion {
                    rect,
                    target: HitTarget::Image(id),
                });
            }
            _ => {
                if !inputs.export_mode {
                    scene.push(
                        Layer::SlotInteraction,
                        SceneItem::FillRect {
                            rect,
                            color: PLACEHOLDER_FILL,
                        },
                    );
                    if let Some(label) = status.label() {
                        push_label(scene, engine, label, rect);
                    }
                }
                empty.push(HitRegion {
                    rect,
                    target: HitTarget::EmptySlot(slot.id),
                });
            }
        }
    }
    (empty, occupied)
}

fn push_label(scene: &mut Scene, engine: &mut TextEngine, label: &str, slot: Rect) {
    let style = TextStyle {
        font_size: LABEL_FONT_SIZE,
        color: LABEL_COLOR.to_string(),
        ..TextStyle::default()
    };
    let Ok(block) = engine.layout(label, &style) else {
        return;
    };
    let center = slot.center();
    let top_left = Point::new(
        center.x - block.size.width * 0.5,
        center.y - block.size.height * 0.5,
    );
    scene.push(
        Layer::SlotInteraction,
        SceneItem::Text {
            block,
            transform: Affine::translate(top_left.to_vec2()),
        },
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/stage.rs"]
mod tests;
