use crate::effects::pipeline::{apply_post_effects, combine_filters};
use crate::filter::apply::apply_filter_ops;
use crate::filter::interpolate::interpolate_filter;
use crate::filter::parse::{FilterOp, parse_filter};
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::StoryResult;
use crate::layout::fit::get_fit_dimensions;
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::drawing::render_drawings;
use crate::render::raster::Rasterizer;
use crate::render::sticker::{StickerImage, render_sticker};
use crate::render::surface::Surface;
use crate::render::text::{FontBook, TextRenderer};
use crate::render::thumbnail::generate_thumbnail;
use crate::scene::model::{StickerElement, StoryEffects, StorySlide};

/// Composes slide frames onto an owned canvas.
///
/// Everything that does not change between frames (parsed filter, drawings, text, stickers) is
/// prepared once in [`FrameComposer::prepare`]; each [`FrameComposer::compose`] call then only
/// redraws the media and the frame-wide effects.
///
/// Frame layout, bottom to top:
/// black fill, filtered media (fit), vignette, grain, tilt-shift, drawings, text, stickers.
pub struct FrameComposer {
    canvas: Canvas,
    rasterizer: Rasterizer,
    filter_ops: Vec<FilterOp>,
    effects: StoryEffects,
    grain_seed: u64,
    overlay: Option<Surface>,
}

impl std::fmt::Debug for FrameComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameComposer")
            .field("canvas", &self.canvas)
            .field("filter_ops", &self.filter_ops.len())
            .field("has_overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}

impl FrameComposer {
    /// Prepare a composer for `slide`.
    ///
    /// `stickers` pairs each sticker element with its decoded artwork, in z-order.
    pub fn prepare(
        canvas: Canvas,
        slide: &StorySlide,
        fonts: &FontBook,
        stickers: &[(StickerElement, StickerImage)],
        grain_seed: u64,
    ) -> StoryResult<Self> {
        let mut rasterizer = Rasterizer::new();
        let slide_filter = slide
            .filter
            .as_deref()
            .map(|f| interpolate_filter(f, slide.filter_intensity));
        let filter_ops = combine_filters(slide_filter.as_deref(), &slide.effects)
            .map(|d| parse_filter(&d))
            .unwrap_or_default();

        let overlay = if slide.drawings.is_empty()
            && slide.texts.iter().all(|t| t.text.trim().is_empty())
            && stickers.is_empty()
        {
            None
        } else {
            let mut layer = Surface::for_canvas(canvas)?;
            render_drawings(&mut rasterizer, &mut layer, &slide.drawings)?;
            let mut text = TextRenderer::new();
            for element in &slide.texts {
                text.render_text(&mut rasterizer, &mut layer, fonts, element)?;
            }
            for (element, image) in stickers {
                render_sticker(&mut rasterizer, &mut layer, element, image)?;
            }
            Some(layer)
        };

        tracing::debug!(
            filter_ops = filter_ops.len(),
            overlay = overlay.is_some(),
            "prepared frame composer"
        );
        Ok(Self {
            canvas,
            rasterizer,
            filter_ops,
            effects: slide.effects.clamped(),
            grain_seed,
            overlay,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Compose one frame around `media`.
    ///
    /// `frame_index` varies the grain pattern so video grain moves between frames.
    pub fn compose(&mut self, media: &Surface, frame_index: u64) -> StoryResult<Surface> {
        let mut frame = Surface::for_canvas(self.canvas)?;
        frame.fill(Rgba8Premul::BLACK);

        let (mw, mh) = (f64::from(media.width()), f64::from(media.height()));
        let fit = get_fit_dimensions(
            mw,
            mh,
            self.canvas.width_f64(),
            self.canvas.height_f64(),
        );
        if !fit.is_empty() {
            let mut placed = self.rasterizer.draw_surface(
                self.canvas.width,
                self.canvas.height,
                media,
                fit.to_affine(mw, mh),
            )?;
            apply_filter_ops(&mut placed, &self.filter_ops)?;
            composite_surface(&mut frame, &placed, 1.0, CompositeOp::SourceOver)?;
        }

        apply_post_effects(
            &mut frame,
            &self.effects,
            self.grain_seed.wrapping_add(frame_index),
        )?;

        if let Some(overlay) = &self.overlay {
            composite_surface(&mut frame, overlay, 1.0, CompositeOp::SourceOver)?;
        }
        Ok(frame)
    }

    /// JPEG thumbnail of a composed frame.
    pub fn thumbnail(&mut self, frame: &Surface, size: u32, quality: f32) -> StoryResult<Vec<u8>> {
        generate_thumbnail(&mut self.rasterizer, frame, size, quality)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composer.rs"]
mod tests;
