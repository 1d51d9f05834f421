use std::sync::Arc;

use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::decode::{decode_image, looks_like_svg, parse_svg};
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::raster::Rasterizer;
use crate::render::surface::Surface;
use crate::render::text::anchor_transform;
use crate::scene::model::StickerElement;

/// Decoded sticker artwork.
#[derive(Clone, Debug)]
pub enum StickerImage {
    Raster(Arc<Surface>),
    Svg(Arc<usvg::Tree>),
}

impl StickerImage {
    /// Decode sticker bytes, choosing SVG or raster from the locator and content.
    pub fn decode(locator: &str, bytes: &[u8]) -> StoryResult<Self> {
        if looks_like_svg(locator, bytes) {
            Ok(Self::Svg(parse_svg(bytes)?))
        } else {
            Ok(Self::Raster(Arc::new(decode_image(bytes)?)))
        }
    }

    /// Intrinsic size in artwork units.
    pub fn intrinsic_size(&self) -> (f64, f64) {
        match self {
            Self::Raster(s) => (f64::from(s.width()), f64::from(s.height())),
            Self::Svg(t) => (
                f64::from(t.size().width()),
                f64::from(t.size().height()),
            ),
        }
    }
}

/// Transform from artwork units to canvas pixels.
///
/// The sticker is `size` percent of canvas width wide (height follows the aspect ratio), centered
/// on its anchor, then rotated and scaled like a text label.
pub fn sticker_transform(sticker: &StickerElement, art_w: f64, art_h: f64, canvas: Canvas) -> Affine {
    if !(art_w > 0.0 && art_h > 0.0) {
        return Affine::scale(0.0);
    }
    let width_px = sticker.size / 100.0 * canvas.width_f64();
    let k = width_px / art_w;
    anchor_transform(
        sticker.position.x,
        sticker.position.y,
        sticker.rotation,
        sticker.scale,
        canvas,
    ) * Affine::scale(k)
        * Affine::translate((-art_w / 2.0, -art_h / 2.0))
}

/// Draw a sticker source-over onto `target`.
pub fn render_sticker(
    rasterizer: &mut Rasterizer,
    target: &mut Surface,
    sticker: &StickerElement,
    image: &StickerImage,
) -> StoryResult<()> {
    let canvas = target.canvas();
    let (art_w, art_h) = image.intrinsic_size();
    let transform = sticker_transform(sticker, art_w, art_h, canvas);

    let layer = match image {
        StickerImage::Raster(s) => {
            rasterizer.draw_surface(canvas.width, canvas.height, s, transform)?
        }
        StickerImage::Svg(tree) => {
            let (w, h, adjust) = svg_raster_params(tree, transform)?;
            let pixels = rasterize_svg(tree, w, h)?;
            rasterizer.draw_surface(canvas.width, canvas.height, &pixels, adjust)?
        }
    };
    composite_surface(target, &layer, 1.0, CompositeOp::SourceOver)?;
    tracing::debug!(id = %sticker.id, "rendered sticker");
    Ok(())
}

/// Raster size for an SVG drawn through `transform`, plus the transform to draw that raster with.
///
/// Rasterizing at the drawn scale avoids blurry upscaling.
fn svg_raster_params(tree: &usvg::Tree, transform: Affine) -> StoryResult<(u32, u32, Affine)> {
    fn to_px(v: f32) -> StoryResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(StoryError::media_load("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = (f64::from(base_w) * sx).ceil().max(1.0) as u32;
    let h = (f64::from(base_h) * sy).ceil().max(1.0) as u32;

    const MAX_DIM: u32 = 16_384;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(StoryError::evaluation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let adjust = transform
        * Affine::scale_non_uniform(
            f64::from(size.width()) / f64::from(w),
            f64::from(size.height()) / f64::from(h),
        );
    Ok((w, h, adjust))
}

fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> StoryResult<Surface> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StoryError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Surface::from_premul(width, height, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/sticker.rs"]
mod tests;
