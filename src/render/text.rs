use std::{borrow::Cow, path::Path};

use anyhow::Context;

use crate::{
    editor::state::TextStyle,
    foundation::core::{Rgb8, Size, parse_hex_color},
    foundation::error::{CutError, CutResult},
};

/// Width of one character, as a fraction of the font size, when no font is available.
const ESTIMATED_ADVANCE: f64 = 0.6;
/// Line height, as a fraction of the font size, when no font is available.
const ESTIMATED_LINE_HEIGHT: f64 = 1.2;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrush {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// One positioned glyph in block-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// Glyphs sharing one font, size and color.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    pub brush: TextBrush,
    pub glyphs: Vec<Glyph>,
}

/// Laid-out text, origin at the block's top-left.
#[derive(Clone, Debug)]
pub struct TextBlock {
    /// Block extent. Estimated when no font is registered.
    pub size: Size,
    /// Empty when no font is registered.
    pub runs: Vec<GlyphRun>,
    /// Draw with a synthetic slant.
    pub italic: bool,
}

struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Shapes text items with Parley against fonts registered from raw bytes.
///
/// Unknown families fall back to the first registered font. With no fonts at all, layout still
/// succeeds with estimated bounds and no glyphs, so text stays selectable but is not drawn; the
/// first such layout logs a warning. [`TextEngine::load_system_fallback`] fills the gap from the
/// host's installed fonts.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    fonts: Vec<RegisteredFont>,
    warned_no_font: bool,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("families", &self.families())
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: Vec::new(),
            warned_no_font: false,
        }
    }

    /// Register font bytes and return the detected family name.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> CutResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CutError::asset("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CutError::asset("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family, "registered font");
        self.fonts.push(RegisteredFont {
            family: family.clone(),
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(family)
    }

    /// Read and register a font file.
    pub fn register_font_file(&mut self, path: &Path) -> CutResult<String> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register_font(bytes)
    }

    /// Register a sans-serif face from the system font database when nothing is registered yet.
    ///
    /// Returns whether a usable font is registered afterwards.
    pub fn load_system_fallback(&mut self) -> bool {
        if self.has_fonts() {
            return true;
        }
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        let query = usvg::fontdb::Query {
            families: &[usvg::fontdb::Family::SansSerif],
            ..usvg::fontdb::Query::default()
        };
        // Faces inside collections are skipped; fonts register at face index 0.
        let id = db
            .query(&query)
            .filter(|id| db.face(*id).is_some_and(|f| f.index == 0))
            .or_else(|| db.faces().find(|f| f.index == 0).map(|f| f.id));
        let Some(bytes) = id.and_then(|id| db.with_face_data(id, |data, _| data.to_vec())) else {
            tracing::warn!(faces = db.len(), "no usable system font for text");
            return false;
        };

        match self.register_font(bytes) {
            Ok(family) => {
                tracing::info!(family = %family, "using system font fallback");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "system font fallback failed");
                false
            }
        }
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> Vec<&str> {
        self.fonts.iter().map(|f| f.family.as_str()).collect()
    }

    pub fn has_fonts(&self) -> bool {
        !self.fonts.is_empty()
    }

    /// Lay out `text` with `style`.
    pub fn layout(&mut self, text: &str, style: &TextStyle) -> CutResult<TextBlock> {
        let size_px = style.font_size as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CutError::validation("font size must be finite and > 0"));
        }
        let content = writing_mode_text(text, style.vertical);

        let Some(font_idx) = self.resolve_font(&style.font_family) else {
            if !self.warned_no_font {
                self.warned_no_font = true;
                tracing::warn!(text, "no font registered; text is laid out but not drawn");
            }
            return Ok(TextBlock {
                size: estimate_size(&content, style.font_size),
                runs: Vec::new(),
                italic: style.italic,
            });
        };
        let family = self.fonts[font_idx].family.clone();
        let font = self.fonts[font_idx].data.clone();
        let brush = TextBrush::from(parse_hex_color(&style.color).unwrap_or(Rgb8::BLACK));

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &content, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        let mut layout: parley::Layout<TextBrush> = builder.build(&content);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                runs.push(GlyphRun {
                    font: font.clone(),
                    font_size: run.run().font_size(),
                    brush: run.style().brush,
                    glyphs: run
                        .positioned_glyphs()
                        .map(|g| Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        })
                        .collect(),
                });
            }
        }

        Ok(TextBlock {
            size: Size::new(f64::from(layout.width()), f64::from(layout.height())),
            runs,
            italic: style.italic,
        })
    }

    fn resolve_font(&self, family: &str) -> Option<usize> {
        if self.fonts.is_empty() {
            return None;
        }
        let wanted = family.trim();
        Some(
            self.fonts
                .iter()
                .position(|f| f.family.eq_ignore_ascii_case(wanted))
                .unwrap_or(0),
        )
    }
}

/// Vertical writing puts each character on its own line.
pub fn writing_mode_text(text: &str, vertical: bool) -> String {
    if !vertical {
        return text.to_string();
    }
    text.chars()
        .filter(|c| *c != '\n')
        .map(String::from)
        .collect::<Vec<_>>()
        .join("\n")
}

fn estimate_size(content: &str, font_size: f64) -> Size {
    let lines: Vec<&str> = content.split('\n').collect();
    let widest = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    Size::new(
        widest as f64 * font_size * ESTIMATED_ADVANCE,
        lines.len() as f64 * font_size * ESTIMATED_LINE_HEIGHT,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
