use std::sync::Arc;

use super::*;
use crate::editor::state::TextStyle;
use crate::render::stage::{Layer, SceneEntry};
use crate::render::text::TextEngine;

fn scene(width: u32, height: u32, items: Vec<SceneItem>) -> Scene {
    Scene {
        canvas: Canvas { width, height },
        entries: items
            .into_iter()
            .map(|item| SceneEntry {
                layer: Layer::Images,
                item,
            })
            .collect(),
        hits: Vec::new(),
    }
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Arc<Raster> {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((w * h * 4) as usize)
        .collect();
    Arc::new(Raster::from_rgba8(w, h, data).unwrap())
}

#[test]
fn empty_scene_is_transparent() {
    let frame = rasterize(&scene(8, 6, Vec::new()), 1.0).unwrap();
    assert_eq!((frame.width, frame.height), (8, 6));
    assert!(!frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 0));
}

#[test]
fn output_is_scaled_canvas() {
    let frame = rasterize(&scene(10, 4, Vec::new()), 2.5).unwrap();
    assert_eq!((frame.width, frame.height), (25, 10));
    assert_eq!(frame.data.len(), 25 * 10 * 4);
}

#[test]
fn invalid_or_oversized_scale_is_a_render_error() {
    let s = scene(10, 10, Vec::new());
    assert!(matches!(rasterize(&s, 0.0), Err(CutError::Render(_))));
    assert!(matches!(rasterize(&s, f64::NAN), Err(CutError::Render(_))));
    assert!(matches!(rasterize(&s, 10_000.0), Err(CutError::Render(_))));
}

#[test]
fn solid_image_fills_its_rect() {
    let s = scene(
        16,
        16,
        vec![SceneItem::Image {
            raster: solid(8, 8, [255, 0, 0, 255]),
            transform: Affine::translate((4.0, 4.0)),
        }],
    );
    let frame = rasterize(&s, 1.0).unwrap();
    assert_eq!(px(&frame, 8, 8), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 1, 1)[3], 0);
    assert_eq!(px(&frame, 14, 14)[3], 0);
}

#[test]
fn clip_restricts_drawing() {
    let s = scene(
        16,
        16,
        vec![
            SceneItem::PushClip(Rect::new(0.0, 0.0, 8.0, 16.0)),
            SceneItem::FillRect {
                rect: Rect::new(0.0, 0.0, 16.0, 16.0),
                color: Rgba8::new(0, 0, 255, 255),
            },
            SceneItem::PopClip,
        ],
    );
    let frame = rasterize(&s, 1.0).unwrap();
    assert_eq!(px(&frame, 3, 8), [0, 0, 255, 255]);
    assert_eq!(px(&frame, 12, 8)[3], 0);
}

#[test]
fn later_items_draw_on_top() {
    let s = scene(
        8,
        8,
        vec![
            SceneItem::FillRect {
                rect: Rect::new(0.0, 0.0, 8.0, 8.0),
                color: Rgba8::new(255, 0, 0, 255),
            },
            SceneItem::FillRect {
                rect: Rect::new(0.0, 0.0, 8.0, 8.0),
                color: Rgba8::new(0, 255, 0, 255),
            },
        ],
    );
    let frame = rasterize(&s, 1.0).unwrap();
    assert_eq!(px(&frame, 4, 4), [0, 255, 0, 255]);
}

#[test]
fn glyphs_are_drawn_inside_text_bounds() {
    let font = std::fs::read("tests/data/fonts/Tuffy.ttf").unwrap();
    let mut engine = TextEngine::new();
    engine.register_font(font).unwrap();
    let block = engine
        .layout(
            "HH",
            &TextStyle {
                font_size: 40.0,
                color: "#0000ff".into(),
                ..TextStyle::default()
            },
        )
        .unwrap();
    let (bw, bh) = (block.size.width, block.size.height);
    assert!(bw < 100.0 && bh < 60.0);

    let s = scene(
        120,
        80,
        vec![SceneItem::Text {
            block,
            transform: Affine::translate((10.0, 10.0)),
        }],
    );
    let frame = rasterize(&s, 1.0).unwrap();

    let mut inside = 0;
    for y in 0..frame.height {
        for x in 0..frame.width {
            let p = px(&frame, x, y);
            if p[3] == 0 {
                continue;
            }
            let (fx, fy) = (f64::from(x), f64::from(y));
            assert!(
                fx >= 9.0 && fx <= 11.0 + bw && fy >= 9.0 && fy <= 11.0 + bh,
                "ink at ({x}, {y}) outside text bounds"
            );
            assert_eq!((p[0], p[1]), (0, 0));
            inside += 1;
        }
    }
    assert!(inside > 100, "only {inside} inked pixels");
}
