//! cutframe composes user photos into fixed photo-frame templates and exports them as
//! print-resolution PNGs.
//!
//! - Pick a [`FrameType`] and drive an [`Editor`] with [`Message`]s and input events
//! - Upload images into slots; drag, zoom and annotate them
//! - Export through [`Editor::begin_export`] / [`Editor::finish_export`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod editor;
pub mod export;
pub mod foundation;
pub mod interact;
pub mod layout;
pub mod recolor;
pub mod render;
/// JSON session files.
pub mod session;

pub use crate::foundation::core::{
    Affine, Canvas, ImageId, Point, Rect, Rgb8, Size, TextId, Vec2, parse_hex_color,
};
pub use crate::foundation::error::{CutError, CutResult};

pub use crate::assets::raster::Raster;
pub use crate::editor::authority::Editor;
pub use crate::editor::state::{
    EditorState, ImageTransform, Message, Selection, TextPatch, TextStyle,
};
pub use crate::export::resolution::{DeviceClass, ExportTarget, resolve_export_target};
pub use crate::export::session::{ExportDelivery, ExportOutput, encode_png};
pub use crate::interact::dispatch::{EventKind, HitTarget, InputEvent};
pub use crate::interact::transform::TransformPatch;
pub use crate::layout::registry::{FrameLayout, FrameType, Orientation, Slot, layout, layouts};
pub use crate::recolor::engine::recolor_near_white;
pub use crate::recolor::palette::Palette;
pub use crate::render::cpu::{FrameRGBA, rasterize};
pub use crate::session::SessionFile;
