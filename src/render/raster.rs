use crate::foundation::core::{Affine, Point};
use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Vector rasterizer backed by a reusable `vello_cpu` context.
///
/// Each call to [`Rasterizer::render_layer`] draws into a fresh transparent layer; the context is
/// reset between layers and reused while the dimensions stay the same.
#[derive(Default)]
pub struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .finish()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> StoryResult<R>,
    ) -> StoryResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Run `draw` against a transparent `width`x`height` layer and return the rasterized pixels.
    pub fn render_layer(
        &mut self,
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> StoryResult<()>,
    ) -> StoryResult<Surface> {
        let w: u16 = width
            .try_into()
            .map_err(|_| StoryError::evaluation("layer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| StoryError::evaluation("layer height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(StoryError::validation("layer width/height must be non-zero"));
        }
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            draw(ctx)?;
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            Surface::from_pixmap(&pixmap)
        })
    }

    /// Draw `image` through `transform` onto a transparent `width`x`height` layer.
    pub fn draw_surface(
        &mut self,
        width: u32,
        height: u32,
        image: &Surface,
        transform: Affine,
    ) -> StoryResult<Surface> {
        let paint = image.to_image_paint()?;
        let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
        self.render_layer(width, height, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            Ok(())
        })
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

/// Open polyline through `points`. Returns `None` for fewer than two points.
pub(crate) fn polyline_to_cpu(points: &[Point]) -> Option<vello_cpu::kurbo::BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut out = vello_cpu::kurbo::BezPath::new();
    out.move_to(point_to_cpu(*first));
    for p in rest {
        out.line_to(point_to_cpu(*p));
    }
    Some(out)
}

/// Round-capped, round-joined stroke style.
pub(crate) fn round_stroke(width: f64) -> vello_cpu::kurbo::Stroke {
    let mut stroke = vello_cpu::kurbo::Stroke::new(width);
    stroke.join = vello_cpu::kurbo::Join::Round;
    stroke.start_cap = vello_cpu::kurbo::Cap::Round;
    stroke.end_cap = vello_cpu::kurbo::Cap::Round;
    stroke
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
