//! Export sequencing: one export at a time, overlays hidden for two presented frames before
//! capture, lossless PNG out.

use std::io::Cursor;

use crate::{
    export::resolution::{DeviceClass, ExportTarget},
    foundation::error::{CutError, CutResult},
    foundation::math::unpremul_u8,
    layout::registry::FrameType,
    render::cpu::FrameRGBA,
};

/// Frames that must be presented with overlays hidden before the capture.
pub const REQUIRED_PRESENTED_FRAMES: u32 = 2;

/// Serializes exports; the trigger stays disabled while an export is in flight.
#[derive(Clone, Debug, Default)]
pub struct ExportGate {
    busy: bool,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, failing with [`CutError::ExportBusy`] if already claimed.
    pub fn try_begin(&mut self) -> CutResult<()> {
        if self.busy {
            return Err(CutError::ExportBusy);
        }
        self.busy = true;
        Ok(())
    }

    pub fn release(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

/// An export in flight.
#[derive(Clone, Debug)]
pub struct ExportSession {
    target: ExportTarget,
    frames_presented: u32,
}

impl ExportSession {
    /// Start with overlays suspended and nothing presented yet.
    pub fn new(target: ExportTarget) -> Self {
        Self {
            target,
            frames_presented: 0,
        }
    }

    pub fn target(&self) -> &ExportTarget {
        &self.target
    }

    /// Record one presented frame of the overlay-free stage.
    pub fn frame_presented(&mut self) {
        self.frames_presented = self.frames_presented.saturating_add(1);
    }

    pub fn frames_presented(&self) -> u32 {
        self.frames_presented
    }

    /// Whether the overlay-free state has visibly committed.
    pub fn ready_to_capture(&self) -> bool {
        self.frames_presented >= REQUIRED_PRESENTED_FRAMES
    }

    /// [`CutError::OverlaysPending`] until enough frames were presented.
    pub fn check_capture(&self) -> CutResult<()> {
        if self.ready_to_capture() {
            Ok(())
        } else {
            Err(CutError::OverlaysPending)
        }
    }
}

/// How the encoded PNG reaches the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportDelivery {
    /// Browser-style file download.
    Download,
    /// Native share or save-to-photos flow.
    ShareSheet,
    /// OS file-save dialog.
    SaveDialog,
}

impl ExportDelivery {
    /// A save dialog wins when available; otherwise mobile shares and desktop downloads.
    pub fn choose(device: DeviceClass, save_dialog_available: bool) -> Self {
        match (save_dialog_available, device) {
            (true, _) => Self::SaveDialog,
            (false, DeviceClass::Mobile) => Self::ShareSheet,
            (false, DeviceClass::Desktop) => Self::Download,
        }
    }
}

/// `cut_export_<type>_<ts>.png`.
pub fn export_file_name(frame_type: FrameType, unix_seconds: u64) -> String {
    format!("cut_export_{frame_type}_{unix_seconds}.png")
}

/// Encoded export ready for delivery.
#[derive(Clone, Debug)]
pub struct ExportOutput {
    pub file_name: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub target: ExportTarget,
    pub delivery: ExportDelivery,
}

/// Losslessly encode a frame as PNG. Premultiplied frames are unpremultiplied first.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn encode_png(frame: &FrameRGBA) -> CutResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        for px in data.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data).ok_or_else(|| {
        CutError::render(format!(
            "frame buffer does not match {}x{}",
            frame.width, frame.height
        ))
    })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CutError::render(format!("png encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
