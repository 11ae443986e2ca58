//! The single editing authority.
//!
//! [`Editor`] owns every piece of mutable session data. The compositor and the input dispatcher
//! only read from it and report [`Action`]s back; every change lands through [`Editor::apply`].

use std::{path::PathBuf, sync::Arc};

use crate::{
    assets::artwork::{Artwork, check_image_mime, load_artwork},
    assets::decode::decode_image,
    assets::raster::Raster,
    assets::table::{DecodeStatus, DecodeTable},
    editor::state::{Created, EditorState, Message},
    export::resolution::{DeviceClass, ExportTarget, resolve_export_target},
    export::session::{
        ExportDelivery, ExportGate, ExportOutput, ExportSession, encode_png, export_file_name,
    },
    foundation::core::{ImageId, Point, TextId},
    foundation::error::{CutError, CutResult},
    interact::dispatch::{
        Action, Dispatch, Dispatcher, HitTarget, ImageGeometry, InputEvent, SceneQuery,
    },
    layout::registry::FrameLayout,
    recolor::engine::RecolorCache,
    render::cpu::{FrameRGBA, rasterize},
    render::stage::{Scene, SceneInputs, Stage, build_scene, image_geometry},
    render::text::TextEngine,
};

#[derive(Debug)]
struct ActiveExport {
    session: ExportSession,
    device: DeviceClass,
}

/// Owner of editor state, decoded images, artwork, text shaping, gestures and exports.
#[derive(Debug, Default)]
pub struct Editor {
    state: EditorState,
    decoded: DecodeTable,
    recolor: RecolorCache,
    artwork: Option<Artwork>,
    artwork_root: Option<PathBuf>,
    text: TextEngine,
    dispatcher: Dispatcher,
    export_gate: ExportGate,
    export: Option<ActiveExport>,
    stage: Option<Stage>,
}

impl Editor {
    /// Editor with no artwork source; frames are drawn without their artwork layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor that loads frame artwork from `root` whenever the frame changes.
    pub fn with_artwork_root(root: impl Into<PathBuf>) -> Self {
        Self {
            artwork_root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn decoded(&self) -> &DecodeTable {
        &self.decoded
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn text_engine_mut(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Replace the loaded artwork directly, bypassing the artwork root.
    pub fn set_artwork(&mut self, artwork: Option<Artwork>) {
        self.recolor.invalidate();
        self.artwork = artwork;
    }

    /// Apply one message and keep owned resources in step with the new state.
    pub fn apply(&mut self, msg: Message) -> CutResult<Option<Created>> {
        let frame_before = self.state.frame();
        let transition = self.state.reduce(msg)?;
        self.state = transition.state;

        for id in &transition.released {
            self.decoded.release(*id);
        }
        if !transition.released.is_empty() {
            self.dispatcher.cancel();
        }

        if self.state.frame() != frame_before {
            self.dispatcher.cancel();
            self.reload_artwork();
            if let (Some(stage), Some(layout)) = (self.stage, self.state.layout()) {
                self.stage = Some(Stage {
                    layout,
                    display_width: stage.display_width,
                });
            }
            tracing::info!(frame = ?self.state.frame(), "frame selected");
        }
        Ok(transition.created)
    }

    fn reload_artwork(&mut self) {
        self.recolor.invalidate();
        self.artwork = match (self.state.layout(), &self.artwork_root) {
            (Some(layout), Some(root)) => load_artwork(root, layout),
            _ => None,
        };
    }

    /// Place encoded image bytes in `slot_id` and decode them.
    ///
    /// A decode failure is recorded for the new image and shown as a failed slot, not returned.
    pub fn upload(&mut self, slot_id: &str, bytes: &[u8]) -> CutResult<ImageId> {
        let created = self.apply(Message::InsertImage {
            slot_id: slot_id.to_string(),
        })?;
        let Some(Created::Image(id)) = created else {
            return Err(CutError::validation("image insert created no id"));
        };
        if let DecodeStatus::Ready(raster) = self.decoded.load_with(id, || decode_image(bytes)) {
            tracing::debug!(
                image = %id,
                width = raster.width,
                height = raster.height,
                "image decoded"
            );
        }
        Ok(id)
    }

    /// Image intake: reject non-image MIME types, then [`Editor::upload`].
    ///
    /// A rejected file never reaches the editor state.
    pub fn upload_file(&mut self, slot_id: &str, mime: &str, bytes: &[u8]) -> CutResult<ImageId> {
        check_image_mime(mime)?;
        self.upload(slot_id, bytes)
    }

    /// [`Editor::upload_file`] into the currently selected slot.
    pub fn upload_to_selected_slot(&mut self, mime: &str, bytes: &[u8]) -> CutResult<ImageId> {
        let slot_id = self
            .state
            .selected_slot()
            .ok_or(CutError::NoSlotSelected)?
            .to_string();
        self.upload_file(&slot_id, mime, bytes)
    }

    /// Frame artwork to draw: recolored when possible, otherwise the original.
    pub fn processed_frame(&mut self) -> Option<Arc<Raster>> {
        let artwork = self.artwork.as_ref()?;
        let processed = self.recolor.processed(artwork, self.state.frame_color());
        Some(processed.unwrap_or_else(|| Arc::clone(&artwork.raster)))
    }

    /// Number of recolor passes actually computed so far.
    pub fn recolor_computations(&self) -> u64 {
        self.recolor.computations()
    }

    /// Attach the on-screen stage at `display_width` pixels.
    pub fn attach_stage(&mut self, display_width: f64) -> CutResult<Stage> {
        let layout = self.state.layout().ok_or(CutError::NoFrameSelected)?;
        let stage = Stage::new(layout, display_width)?;
        self.stage = Some(stage);
        Ok(stage)
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Whether export mode currently hides editing decorations.
    pub fn is_exporting(&self) -> bool {
        self.export.is_some()
    }

    /// Current display list.
    pub fn scene(&mut self) -> CutResult<Scene> {
        let layout = self.state.layout().ok_or(CutError::NoFrameSelected)?;
        let frame = self.processed_frame();
        let inputs = SceneInputs {
            layout,
            state: &self.state,
            decoded: &self.decoded,
            frame: frame.as_ref(),
            dispatcher: Some(&self.dispatcher),
            export_mode: self.export.is_some(),
        };
        Ok(build_scene(&inputs, &mut self.text))
    }

    /// Hit-test `event` (canvas space) against the current scene and route it.
    pub fn handle_event(&mut self, event: InputEvent) -> CutResult<Dispatch> {
        let target = match event.pointer {
            Some(p) => self.scene()?.hit_test(p),
            None => HitTarget::Stage,
        };
        self.handle_input(target, event)
    }

    /// Route an already hit-tested event and apply the resulting actions.
    pub fn handle_input(&mut self, target: HitTarget, event: InputEvent) -> CutResult<Dispatch> {
        let Some(layout) = self.state.layout() else {
            return Ok(Dispatch::default());
        };
        let query = EditorQuery {
            layout,
            state: &self.state,
            decoded: &self.decoded,
        };
        let dispatch = self.dispatcher.dispatch(target, event, &query);

        for action in &dispatch.actions {
            match action {
                Action::Select(sel) => {
                    self.apply(Message::Select(*sel))?;
                }
                Action::SelectSlot(slot) => {
                    self.apply(Message::SelectSlot(slot.clone()))?;
                }
                Action::CommitTransform { id, patch } => {
                    self.apply(Message::ApplyTransform {
                        id: *id,
                        patch: *patch,
                    })?;
                }
                Action::MoveText { id, position } => {
                    self.apply(Message::MoveText {
                        id: *id,
                        position: *position,
                    })?;
                }
                Action::OpenFilePicker { slot_id } => {
                    self.apply(Message::SelectSlot(Some(slot_id.clone())))?;
                }
                Action::RenderNeeded => {}
            }
        }
        Ok(dispatch)
    }

    /// Enter export mode and resolve the print target.
    pub fn begin_export(&mut self, device: DeviceClass) -> CutResult<ExportTarget> {
        let frame_type = self.state.frame().ok_or(CutError::NoFrameSelected)?;
        let stage = self.stage.ok_or(CutError::StageNotReady)?;
        self.export_gate.try_begin()?;

        let target = match resolve_export_target(frame_type, stage.display_width, device) {
            Ok(t) => t,
            Err(err) => {
                self.export_gate.release();
                return Err(err);
            }
        };
        self.dispatcher.cancel();
        self.export = Some(ActiveExport {
            session: ExportSession::new(target),
            device,
        });
        tracing::info!(
            frame = %frame_type,
            pixel_ratio = target.pixel_ratio,
            capped = target.capped,
            "export started"
        );
        Ok(target)
    }

    /// Record that the overlay-free stage was presented once.
    pub fn frame_presented(&mut self) {
        if let Some(active) = &mut self.export {
            active.session.frame_presented();
        }
    }

    /// Capture, encode and leave export mode. Export mode is left even on failure.
    #[tracing::instrument(skip(self))]
    pub fn finish_export(
        &mut self,
        unix_seconds: u64,
        save_dialog_available: bool,
    ) -> CutResult<ExportOutput> {
        let result = self.capture_export(unix_seconds, save_dialog_available);
        self.export = None;
        self.export_gate.release();
        match &result {
            Ok(out) => tracing::info!(
                file = %out.file_name,
                width = out.width,
                height = out.height,
                "export finished"
            ),
            Err(err) => tracing::warn!(error = %err, "export failed"),
        }
        result
    }

    fn capture_export(
        &mut self,
        unix_seconds: u64,
        save_dialog_available: bool,
    ) -> CutResult<ExportOutput> {
        let (target, device) = {
            let active = self
                .export
                .as_ref()
                .ok_or_else(|| CutError::validation("no export in progress"))?;
            active.session.check_capture()?;
            (*active.session.target(), active.device)
        };
        let stage = self.stage.ok_or(CutError::StageNotReady)?;

        let frame = self.render_frame(stage.scale() * target.pixel_ratio)?;
        let png = encode_png(&frame)?;
        Ok(ExportOutput {
            file_name: export_file_name(target.frame_type, unix_seconds),
            png,
            width: frame.width,
            height: frame.height,
            target,
            delivery: ExportDelivery::choose(device, save_dialog_available),
        })
    }

    /// Rasterize the current scene with `scale` output pixels per canvas unit.
    pub fn render_frame(&mut self, scale: f64) -> CutResult<FrameRGBA> {
        let scene = self.scene()?;
        rasterize(&scene, scale)
    }

    /// Run a whole export without a presenting host.
    pub fn export_now(
        &mut self,
        device: DeviceClass,
        unix_seconds: u64,
        save_dialog_available: bool,
    ) -> CutResult<ExportOutput> {
        self.begin_export(device)?;
        for _ in 0..crate::export::session::REQUIRED_PRESENTED_FRAMES {
            self.frame_presented();
        }
        self.finish_export(unix_seconds, save_dialog_available)
    }
}

struct EditorQuery<'a> {
    layout: &'static FrameLayout,
    state: &'a EditorState,
    decoded: &'a DecodeTable,
}

impl SceneQuery for EditorQuery<'_> {
    fn image_geometry(&self, id: ImageId) -> Option<ImageGeometry> {
        image_geometry(self.layout, self.state, self.decoded, id)
    }

    fn text_position(&self, id: TextId) -> Option<Point> {
        self.state.text(id).map(|t| t.position)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/authority.rs"]
mod tests;
