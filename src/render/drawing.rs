use crate::foundation::error::StoryResult;
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::raster::{Rasterizer, polyline_to_cpu, round_stroke};
use crate::render::surface::Surface;
use crate::scene::color::parse_color;
use crate::scene::model::{Brush, DrawingElement};

/// Opacity of highlighter ink.
pub const HIGHLIGHTER_ALPHA: f32 = 0.7;

fn is_drawable(d: &DrawingElement) -> bool {
    d.points.len() >= 2 && d.stroke_width.is_finite() && d.stroke_width > 0.0
}

/// Rasterize `drawings` into a transparent ink layer of `width`x`height`.
///
/// Ink strokes draw in list order. Every eraser stroke is stroked into a cutout mask that is then
/// removed from the whole ink group with destination-out, so erasing never reaches the media below.
pub fn drawing_layer(
    rasterizer: &mut Rasterizer,
    width: u32,
    height: u32,
    drawings: &[DrawingElement],
) -> StoryResult<Surface> {
    let mut ink_strokes = Vec::new();
    let mut erase_strokes = Vec::new();
    for d in drawings {
        if !is_drawable(d) {
            tracing::debug!(
                id = %d.id,
                points = d.points.len(),
                width = d.stroke_width,
                "skipping degenerate stroke"
            );
            continue;
        }
        if d.is_erase() {
            erase_strokes.push(d);
        } else {
            let color = parse_color(&d.color)?;
            ink_strokes.push((d, color));
        }
    }

    let mut ink = rasterizer.render_layer(width, height, |ctx| {
        for (d, color) in &ink_strokes {
            let Some(path) = polyline_to_cpu(&d.points) else {
                continue;
            };
            let translucent = d.brush == Brush::Highlighter;
            if translucent {
                ctx.push_opacity_layer(HIGHLIGHTER_ALPHA);
            }
            ctx.set_paint(color.to_cpu_color());
            ctx.set_stroke(round_stroke(d.stroke_width));
            ctx.stroke_path(&path);
            if translucent {
                ctx.pop_layer();
            }
        }
        Ok(())
    })?;

    if !erase_strokes.is_empty() {
        let mask = rasterizer.render_layer(width, height, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
            for d in &erase_strokes {
                if let Some(path) = polyline_to_cpu(&d.points) {
                    ctx.set_stroke(round_stroke(d.stroke_width));
                    ctx.stroke_path(&path);
                }
            }
            Ok(())
        })?;
        composite_surface(&mut ink, &mask, 1.0, CompositeOp::DestinationOut)?;
    }

    tracing::debug!(
        ink = ink_strokes.len(),
        erase = erase_strokes.len(),
        "rasterized drawings"
    );
    Ok(ink)
}

/// Rasterize `drawings` and composite the ink source-over onto `target`.
pub fn render_drawings(
    rasterizer: &mut Rasterizer,
    target: &mut Surface,
    drawings: &[DrawingElement],
) -> StoryResult<()> {
    if drawings.iter().all(|d| !is_drawable(d)) {
        return Ok(());
    }
    let ink = drawing_layer(rasterizer, target.width(), target.height(), drawings)?;
    composite_surface(target, &ink, 1.0, CompositeOp::SourceOver)
}

#[cfg(test)]
#[path = "../../tests/unit/render/drawing.rs"]
mod tests;
