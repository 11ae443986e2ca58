use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CutError, CutResult};

/// Built-in frame colors used when no palette config is available.
pub const DEFAULT_FRAME_COLORS: [&str; 8] = [
    "#ffffff", "#000000", "#f5e6c8", "#c0392b", "#2c3e50", "#27ae60", "#f1c40f", "#8e44ad",
];

/// Presets beyond this count are dropped.
pub const MAX_PALETTE_COLORS: usize = 24;

/// Exactly `#RGB` or `#RRGGBB`, hex digits in either case.
pub fn is_strict_hex(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PaletteDoc {
    List(Vec<serde_json::Value>),
    Object {
        #[serde(rename = "frameColors")]
        frame_colors: Vec<serde_json::Value>,
    },
}

/// Preset frame colors offered to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_FRAME_COLORS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl Palette {
    /// Strictly parse a palette document.
    ///
    /// Accepts a JSON array of strings or an object with a `frameColors` array. Entries that are
    /// not strings or not strict hex are dropped, order is kept, and at most
    /// [`MAX_PALETTE_COLORS`] survive. A document with no valid entry is an error.
    pub fn parse(json: &str) -> CutResult<Self> {
        let doc: PaletteDoc = serde_json::from_str(json)?;
        let entries = match doc {
            PaletteDoc::List(v) => v,
            PaletteDoc::Object { frame_colors } => frame_colors,
        };

        let colors: Vec<String> = entries
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|s| is_strict_hex(s))
            .take(MAX_PALETTE_COLORS)
            .map(str::to_string)
            .collect();

        if colors.is_empty() {
            return Err(CutError::validation("palette has no valid colors"));
        }
        Ok(Self { colors })
    }

    /// [`Palette::parse`], keeping the default palette on any failure.
    pub fn from_json(json: &str) -> Self {
        Self::parse(json).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "palette config rejected; keeping defaults");
            Self::default()
        })
    }

    /// Read a palette config file, keeping the default palette on any failure.
    pub fn load(path: &Path) -> Self {
        let read = std::fs::read_to_string(path)
            .with_context(|| format!("read palette config '{}'", path.display()))
            .map_err(CutError::from)
            .and_then(|json| Self::parse(&json));
        match read {
            Ok(p) => p,
            Err(err) => {
                tracing::debug!(error = %err, "palette config unavailable; keeping defaults");
                Self::default()
            }
        }
    }

    /// Preset colors in config order.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/palette.rs"]
mod tests;
