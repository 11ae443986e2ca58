use crate::{
    assets::raster::Raster,
    foundation::core::{Affine, Canvas, Point, Rect},
    foundation::error::{CutError, CutResult},
    foundation::math::unpremul_u8,
    render::stage::{Rgba8, Scene, SceneItem},
    render::text::TextBlock,
};

/// Rasterized frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

/// Output size for `canvas` rendered at `scale`.
pub fn output_size(canvas: Canvas, scale: f64) -> CutResult<(u16, u16)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CutError::render(format!(
            "render scale must be finite and > 0, got {scale}"
        )));
    }
    let dim = |v: u32, axis: &str| -> CutResult<u16> {
        let px = (f64::from(v) * scale).round().max(1.0);
        if px > f64::from(u16::MAX) {
            return Err(CutError::render(format!(
                "output {axis} {px} exceeds {}",
                u16::MAX
            )));
        }
        Ok(px as u16)
    };
    Ok((dim(canvas.width, "width")?, dim(canvas.height, "height")?))
}

/// Rasterize `scene` with every canvas unit mapped to `scale` output pixels.
///
/// The result is straight (non-premultiplied) RGBA8 on a transparent background.
#[tracing::instrument(
    skip(scene),
    fields(canvas_w = scene.canvas.width, canvas_h = scene.canvas.height)
)]
pub fn rasterize(scene: &Scene, scale: f64) -> CutResult<FrameRGBA> {
    let (width, height) = output_size(scene.canvas, scale)?;
    let base = Affine::scale(scale);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    for entry in &scene.entries {
        draw_item(&mut ctx, base, &entry.item)?;
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = unpremul_u8(px[0], a);
        px[1] = unpremul_u8(px[1], a);
        px[2] = unpremul_u8(px[2], a);
    }

    tracing::debug!(width, height, "scene rasterized");
    Ok(FrameRGBA {
        width: u32::from(width),
        height: u32::from(height),
        data,
        premultiplied: false,
    })
}

fn draw_item(
    ctx: &mut vello_cpu::RenderContext,
    base: Affine,
    item: &SceneItem,
) -> CutResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match item {
        SceneItem::PushClip(rect) => {
            ctx.set_transform(affine_to_cpu(base));
            ctx.push_clip_layer(&rect_path(*rect));
        }
        SceneItem::PopClip => ctx.pop_layer(),
        SceneItem::Image { raster, transform } => {
            let paint = image_paint(raster)?;
            ctx.set_transform(affine_to_cpu(base * *transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(raster.width),
                f64::from(raster.height),
            ));
        }
        SceneItem::FillRect { rect, color } => {
            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(*color));
            ctx.fill_rect(&rect_to_cpu(*rect));
        }
        SceneItem::StrokeRect { rect, color, width } => {
            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(*color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
            ctx.stroke_rect(&rect_to_cpu(*rect));
        }
        SceneItem::Line {
            from,
            to,
            color,
            width,
        } => {
            let mut path = vello_cpu::kurbo::BezPath::new();
            path.move_to(point_to_cpu(*from));
            path.line_to(point_to_cpu(*to));
            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(*color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
            ctx.stroke_path(&path);
        }
        SceneItem::Text { block, transform } => {
            ctx.set_transform(affine_to_cpu(base * *transform));
            draw_text(ctx, block);
        }
    }
    Ok(())
}

fn draw_text(ctx: &mut vello_cpu::RenderContext, block: &TextBlock) {
    for run in &block.runs {
        let b = run.brush;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
        let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        ctx.glyph_run(&run.font)
            .font_size(run.font_size)
            .fill_glyphs(glyphs);
    }
}

fn image_paint(raster: &Raster) -> CutResult<vello_cpu::Image> {
    let w: u16 = raster
        .width
        .try_into()
        .map_err(|_| CutError::render("image width exceeds u16"))?;
    let h: u16 = raster
        .height
        .try_into()
        .map_err(|_| CutError::render("image height exceeds u16"))?;

    let premul = raster.to_premul_rgba8();
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(premul.len() / 4);
    for px in premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn rect_path(r: Rect) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to((r.x0, r.y0));
    path.line_to((r.x1, r.y0));
    path.line_to((r.x1, r.y1));
    path.line_to((r.x0, r.y1));
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
