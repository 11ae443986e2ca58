//! Static table of frame templates.
//!
//! Every layout lives in its own canvas coordinate space; slot rectangles are expressed in that
//! same space. The table is closed: there is no way to register layouts at runtime.

use std::fmt;

use crate::foundation::core::{Canvas, Point, Rect, Size};

const HORIZONTAL: Canvas = Canvas {
    width: 719,
    height: 483,
};
const VERTICAL: Canvas = Canvas {
    width: 483,
    height: 719,
};

/// Known frame template identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FrameType {
    /// One cut with lettering.
    #[serde(rename = "1l")]
    OneLettering,
    /// One cut with frame border.
    #[serde(rename = "1f")]
    OneFramed,
    /// Two cuts, unsuffixed compat layout (vertical).
    #[serde(rename = "2")]
    Two,
    /// Two cuts, horizontal.
    #[serde(rename = "2h")]
    TwoHorizontal,
    /// Two cuts, vertical.
    #[serde(rename = "2v")]
    TwoVertical,
    /// Four cuts, unsuffixed compat layout (vertical).
    #[serde(rename = "4")]
    Four,
    /// Four cuts, vertical.
    #[serde(rename = "4v")]
    FourVertical,
    /// Six cuts, unsuffixed compat layout (vertical).
    #[serde(rename = "6")]
    Six,
    /// Six cuts, vertical.
    #[serde(rename = "6v")]
    SixVertical,
    /// Nine cuts, unsuffixed compat layout (vertical).
    #[serde(rename = "9")]
    Nine,
    /// Nine cuts, vertical.
    #[serde(rename = "9v")]
    NineVertical,
}

impl FrameType {
    /// Every frame type in registry order.
    pub const ALL: [Self; 11] = [
        Self::OneLettering,
        Self::OneFramed,
        Self::Two,
        Self::TwoHorizontal,
        Self::TwoVertical,
        Self::Four,
        Self::FourVertical,
        Self::Six,
        Self::SixVertical,
        Self::Nine,
        Self::NineVertical,
    ];

    /// Wire identifier, e.g. `"2h"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneLettering => "1l",
            Self::OneFramed => "1f",
            Self::Two => "2",
            Self::TwoHorizontal => "2h",
            Self::TwoVertical => "2v",
            Self::Four => "4",
            Self::FourVertical => "4v",
            Self::Six => "6",
            Self::SixVertical => "6v",
            Self::Nine => "9",
            Self::NineVertical => "9v",
        }
    }

    /// Parse a wire identifier. Unknown identifiers yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Orientation by naming convention: identifiers ending in `h` are horizontal.
    pub fn orientation(self) -> Orientation {
        if self.as_str().ends_with('h') {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical print orientation of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Wider than tall.
    Horizontal,
    /// Taller than wide.
    Vertical,
}

/// A rectangular image slot in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Slot {
    /// Identifier, unique within its layout.
    pub id: &'static str,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Slot {
    const fn new(id: &'static str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Slot size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Slot rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// An immutable frame template.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameLayout {
    /// Template identifier.
    pub frame_type: FrameType,
    /// Human-readable name.
    pub name: &'static str,
    /// Artwork asset path, relative to the artwork root.
    pub artwork: &'static str,
    /// Canvas size in canvas pixels.
    pub canvas: Canvas,
    /// Ordered slots.
    pub slots: &'static [Slot],
}

impl FrameLayout {
    /// Look up a slot by id.
    pub fn slot(&self, id: &str) -> Option<&'static Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Orientation of the printed result.
    pub fn orientation(&self) -> Orientation {
        self.frame_type.orientation()
    }

    /// Where newly inserted text lands: horizontally centered, near the bottom edge.
    pub fn default_text_position(&self) -> Point {
        let size = self.canvas.size();
        let y_frac = match self.orientation() {
            Orientation::Horizontal => 0.85,
            Orientation::Vertical => 0.88,
        };
        Point::new(size.width * 0.5, size.height * y_frac)
    }
}

static SLOTS_1L: [Slot; 1] = [Slot::new("slot-1", 0.0, 0.0, 483.0, 725.0)];

static SLOTS_1F: [Slot; 1] = [Slot::new("slot-1", 30.0, 16.0, 420.0, 630.0)];

static SLOTS_2: [Slot; 2] = [
    Slot::new("slot-1", 8.0, 90.0, 384.0, 200.0),
    Slot::new("slot-2", 50.0, 340.0, 300.0, 180.0),
];

static SLOTS_2H: [Slot; 2] = [
    Slot::new("slot-1", 16.0, 16.0, 300.0, 452.0),
    Slot::new("slot-2", 331.0, 16.0, 300.0, 452.0),
];

static SLOTS_2V: [Slot; 2] = [
    Slot::new("slot-1", 9.0, 46.0, 465.0, 276.0),
    Slot::new("slot-2", 9.0, 331.0, 465.0, 276.0),
];

static SLOTS_4: [Slot; 4] = [
    Slot::new("slot-1", 9.0, 46.0, 100.0, 200.0),
    Slot::new("slot-2", 350.0, 50.0, 200.0, 200.0),
    Slot::new("slot-3", 9.0, 331.0, 200.0, 200.0),
    Slot::new("slot-4", 350.0, 350.0, 200.0, 200.0),
];

static SLOTS_4V: [Slot; 4] = [
    Slot::new("slot-1", 30.0, 20.0, 200.0, 300.0),
    Slot::new("slot-2", 252.0, 20.0, 200.0, 300.0),
    Slot::new("slot-3", 30.0, 340.0, 200.0, 300.0),
    Slot::new("slot-4", 252.0, 340.0, 200.0, 300.0),
];

static SLOTS_6: [Slot; 6] = [
    Slot::new("slot-1", 50.0, 50.0, 200.0, 200.0),
    Slot::new("slot-2", 350.0, 50.0, 200.0, 200.0),
    Slot::new("slot-3", 50.0, 300.0, 200.0, 200.0),
    Slot::new("slot-4", 350.0, 300.0, 200.0, 200.0),
    Slot::new("slot-5", 50.0, 550.0, 200.0, 200.0),
    Slot::new("slot-6", 350.0, 550.0, 200.0, 200.0),
];

static SLOTS_6V: [Slot; 6] = [
    Slot::new("slot-1", 10.0, 20.0, 224.0, 200.0),
    Slot::new("slot-2", 249.0, 20.0, 224.0, 200.0),
    Slot::new("slot-3", 10.0, 230.0, 224.0, 200.0),
    Slot::new("slot-4", 249.0, 230.0, 224.0, 200.0),
    Slot::new("slot-5", 10.0, 440.0, 224.0, 200.0),
    Slot::new("slot-6", 249.0, 440.0, 224.0, 200.0),
];

static SLOTS_9: [Slot; 9] = [
    Slot::new("slot-1", 80.0, 80.0, 130.0, 130.0),
    Slot::new("slot-2", 235.0, 80.0, 130.0, 130.0),
    Slot::new("slot-3", 390.0, 80.0, 130.0, 130.0),
    Slot::new("slot-4", 80.0, 235.0, 130.0, 130.0),
    Slot::new("slot-5", 235.0, 235.0, 130.0, 130.0),
    Slot::new("slot-6", 390.0, 235.0, 130.0, 130.0),
    Slot::new("slot-7", 80.0, 390.0, 130.0, 130.0),
    Slot::new("slot-8", 235.0, 390.0, 130.0, 130.0),
    Slot::new("slot-9", 390.0, 390.0, 130.0, 130.0),
];

static SLOTS_9V: [Slot; 9] = [
    Slot::new("slot-1", 20.0, 60.0, 140.0, 180.0),
    Slot::new("slot-2", 172.0, 60.0, 140.0, 180.0),
    Slot::new("slot-3", 324.0, 60.0, 140.0, 180.0),
    Slot::new("slot-4", 20.0, 252.0, 140.0, 180.0),
    Slot::new("slot-5", 172.0, 252.0, 140.0, 180.0),
    Slot::new("slot-6", 324.0, 252.0, 140.0, 180.0),
    Slot::new("slot-7", 20.0, 444.0, 140.0, 180.0),
    Slot::new("slot-8", 172.0, 444.0, 140.0, 180.0),
    Slot::new("slot-9", 324.0, 444.0, 140.0, 180.0),
];

static LAYOUTS: [FrameLayout; 11] = [
    FrameLayout {
        frame_type: FrameType::OneLettering,
        name: "1-cut lettering",
        artwork: "frame/1_l.png",
        canvas: VERTICAL,
        slots: &SLOTS_1L,
    },
    FrameLayout {
        frame_type: FrameType::OneFramed,
        name: "1-cut frame",
        artwork: "frame/1_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_1F,
    },
    FrameLayout {
        frame_type: FrameType::Two,
        name: "2-cut",
        artwork: "frame/2_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_2,
    },
    FrameLayout {
        frame_type: FrameType::TwoHorizontal,
        name: "2-cut horizontal",
        artwork: "frame/2_h.png",
        canvas: HORIZONTAL,
        slots: &SLOTS_2H,
    },
    FrameLayout {
        frame_type: FrameType::TwoVertical,
        name: "2-cut vertical",
        artwork: "frame/2_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_2V,
    },
    FrameLayout {
        frame_type: FrameType::Four,
        name: "4-cut",
        artwork: "frame/4_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_4,
    },
    FrameLayout {
        frame_type: FrameType::FourVertical,
        name: "4-cut vertical",
        artwork: "frame/4_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_4V,
    },
    FrameLayout {
        frame_type: FrameType::Six,
        name: "6-cut",
        artwork: "frame/9_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_6,
    },
    FrameLayout {
        frame_type: FrameType::SixVertical,
        name: "6-cut vertical",
        artwork: "frame/6_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_6V,
    },
    FrameLayout {
        frame_type: FrameType::Nine,
        name: "9-cut",
        artwork: "frame/9_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_9,
    },
    FrameLayout {
        frame_type: FrameType::NineVertical,
        name: "9-cut vertical",
        artwork: "frame/9_v.png",
        canvas: VERTICAL,
        slots: &SLOTS_9V,
    },
];

/// Layout for a known frame type.
pub fn layout(frame_type: FrameType) -> &'static FrameLayout {
    // The table is indexed in `FrameType::ALL` order.
    let idx = FrameType::ALL
        .iter()
        .position(|t| *t == frame_type)
        .unwrap_or(0);
    &LAYOUTS[idx]
}

/// Look up a layout by wire identifier. Unknown identifiers mean "no frame selected".
pub fn layout_for(frame_type: &str) -> Option<&'static FrameLayout> {
    FrameType::parse(frame_type).map(layout)
}

/// All layouts in registry order.
pub fn layouts() -> &'static [FrameLayout] {
    &LAYOUTS
}

#[cfg(test)]
#[path = "../../tests/unit/layout/registry.rs"]
mod tests;
