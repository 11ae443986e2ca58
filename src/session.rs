//! JSON session files.
//!
//! A session describes one editing session (frame, color, images, texts, fonts) so the editor can
//! be driven without an interactive host. Relative paths resolve against the session file's
//! directory.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::artwork::mime_for_path,
    editor::authority::Editor,
    editor::state::{Created, Message, TextStyle},
    export::resolution::DeviceClass,
    foundation::core::Point,
    foundation::error::{CutError, CutResult},
    interact::transform::TransformPatch,
    layout::registry::FrameType,
};

/// One placed image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionImage {
    pub slot: String,
    /// Encoded image file.
    pub source: PathBuf,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Degrees.
    #[serde(default)]
    pub rotation: f64,
}

fn unit_scale() -> f64 {
    1.0
}

/// One text overlay. A missing coordinate falls back to the frame's default text position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionText {
    pub text: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Session document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionFile {
    pub frame: FrameType,
    #[serde(default)]
    pub frame_color: Option<String>,
    /// On-screen stage width in pixels; defaults to the canvas width.
    #[serde(default)]
    pub stage_width: Option<f64>,
    #[serde(default)]
    pub device: DeviceClass,
    /// Directory frame artwork paths are relative to.
    #[serde(default)]
    pub artwork_root: Option<PathBuf>,
    #[serde(default)]
    pub images: Vec<SessionImage>,
    #[serde(default)]
    pub texts: Vec<SessionText>,
    /// Font files registered with the text engine, in order.
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
}

impl SessionFile {
    /// Parse a session document. Paths are left as written.
    pub fn from_json(json: &str) -> CutResult<Self> {
        let session: Self = serde_json::from_str(json)?;
        session.validate()?;
        Ok(session)
    }

    /// Read a session file and resolve its relative paths against the file's directory.
    pub fn load(path: &Path) -> CutResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read session '{}'", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::from_json(&json)?.resolve_paths(base))
    }

    fn validate(&self) -> CutResult<()> {
        if let Some(w) = self.stage_width
            && (!w.is_finite() || w <= 0.0)
        {
            return Err(CutError::validation(format!(
                "stage_width must be finite and > 0, got {w}"
            )));
        }
        let layout = crate::layout::registry::layout(self.frame);
        for img in &self.images {
            if layout.slot(&img.slot).is_none() {
                return Err(CutError::validation(format!(
                    "slot '{}' does not exist in frame '{}'",
                    img.slot, self.frame
                )));
            }
        }
        Ok(())
    }

    /// Rebase every relative path onto `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(root) = &mut self.artwork_root {
            rebase(root);
        }
        for img in &mut self.images {
            rebase(&mut img.source);
        }
        for font in &mut self.fonts {
            rebase(font);
        }
        self
    }

    /// Build an editor in the state this session describes, with the stage attached.
    #[tracing::instrument(skip(self), fields(frame = %self.frame))]
    pub fn build_editor(&self) -> CutResult<Editor> {
        let mut editor = match &self.artwork_root {
            Some(root) => Editor::with_artwork_root(root.clone()),
            None => Editor::new(),
        };

        for font in &self.fonts {
            if let Err(err) = editor.text_engine_mut().register_font_file(font) {
                tracing::warn!(font = %font.display(), error = %err, "font skipped");
            }
        }
        if !self.texts.is_empty() && !editor.text_engine_mut().has_fonts() {
            editor.text_engine_mut().load_system_fallback();
        }

        editor.apply(Message::SelectFrame(Some(self.frame)))?;
        if let Some(color) = &self.frame_color {
            editor.apply(Message::SetFrameColor(color.clone()))?;
        }

        for img in &self.images {
            let bytes = std::fs::read(&img.source)
                .with_context(|| format!("read image '{}'", img.source.display()))?;
            let id = editor.upload_file(&img.slot, mime_for_path(&img.source), &bytes)?;
            let patch = TransformPatch {
                offset_x: Some(img.offset_x),
                offset_y: Some(img.offset_y),
                scale: Some(img.scale),
                rotation: Some(img.rotation),
            }
            .finite_only();
            editor.apply(Message::ApplyTransform { id, patch })?;
        }

        for t in &self.texts {
            let created = editor.apply(Message::InsertText {
                text: t.text.clone(),
                style: t.style.clone(),
            })?;
            let Some(Created::Text(id)) = created else {
                continue;
            };
            if t.x.is_none() && t.y.is_none() {
                continue;
            }
            let default = editor
                .state()
                .text(id)
                .map_or(Point::ZERO, |item| item.position);
            let position = Point::new(t.x.unwrap_or(default.x), t.y.unwrap_or(default.y));
            editor.apply(Message::MoveText { id, position })?;
        }

        let layout = crate::layout::registry::layout(self.frame);
        let width = self
            .stage_width
            .unwrap_or_else(|| f64::from(layout.canvas.width));
        editor.attach_stage(width)?;
        Ok(editor)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
