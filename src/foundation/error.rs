/// Crate-wide result alias.
pub type CutResult<T> = Result<T, CutError>;

/// Errors produced by the collage core.
///
/// Only the user-precondition variants (see [`CutError::is_user_facing`]) are meant to reach the
/// person using the editor. Everything else is absorbed at the boundary where it happens.
#[derive(thiserror::Error, Debug)]
pub enum CutError {
    /// Malformed input (unknown slot, unparsable session, bad dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image or artwork could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Raster pixels are not readable (cross-origin tainted source).
    #[error("pixel access denied: {0}")]
    PixelAccess(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Export was requested without a selected frame.
    #[error("select a frame first")]
    NoFrameSelected,

    /// A slot-targeted upload was requested without a selected slot.
    #[error("select a slot first")]
    NoSlotSelected,

    /// The rendering surface has not been attached yet.
    #[error("stage is not ready")]
    StageNotReady,

    /// Another export is still in flight.
    #[error("an export is already in progress")]
    ExportBusy,

    /// Capture was attempted before the overlay-free state was presented.
    #[error("editing overlays are not yet hidden")]
    OverlaysPending,

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Context-carrying IO and library errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutError {
    /// Build a [`CutError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CutError::PixelAccess`].
    pub fn pixel_access(msg: impl Into<String>) -> Self {
        Self::PixelAccess(msg.into())
    }

    /// Build a [`CutError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CutError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error is a user precondition failure that should be shown as a message.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoFrameSelected | Self::NoSlotSelected | Self::StageNotReady
        )
    }
}

impl From<serde_json::Error> for CutError {
    fn from(value: serde_json::Error) -> Self {
        Self::serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
