use std::collections::HashMap;
use std::sync::Arc;

use crate::effects::blur::gaussian_blur_surface;
use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::error::{StoryError, StoryResult};
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::raster::{Rasterizer, affine_to_cpu};
use crate::render::surface::Surface;
use crate::scene::color::{Rgba8, parse_color};
use crate::scene::model::TextElement;

/// Font size as a fraction of canvas width.
pub const TEXT_SIZE_FRACTION: f64 = 0.08;
/// Drop shadow color.
pub const TEXT_SHADOW_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 128);
/// Drop shadow blur length; the gaussian sigma is half of it.
pub const TEXT_SHADOW_BLUR: f32 = 4.0;
/// Drop shadow offset in canvas pixels (down and right).
pub const TEXT_SHADOW_OFFSET: (f64, f64) = (2.0, 2.0);

/// Font bytes available to text layers.
///
/// Text elements name a font key; unknown or empty keys fall back to the default font.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    default: Option<Arc<Vec<u8>>>,
    named: HashMap<String, Arc<Vec<u8>>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback font.
    pub fn with_default(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.default = Some(Arc::new(bytes.into()));
        self
    }

    /// Register a font under `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.named.insert(name.into(), Arc::new(bytes.into()));
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Bytes for `name`, falling back to the default font.
    pub fn resolve(&self, name: &str) -> Option<&Arc<Vec<u8>>> {
        self.named.get(name).or(self.default.as_ref())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A font registered with the layout engine, ready for shaping and glyph drawing.
struct RegisteredFont {
    /// Keeps the source bytes alive so the cache key address stays unique.
    _bytes: Arc<Vec<u8>>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Stateful helper for building bold Parley layouts from raw font bytes.
///
/// Each distinct font buffer is registered with fontique once and reused afterwards.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<usize, RegisteredFont>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn registered_count(&self) -> usize {
        self.registered.len()
    }

    fn register(&mut self, font_bytes: &Arc<Vec<u8>>) -> StoryResult<&RegisteredFont> {
        let key = Arc::as_ptr(font_bytes) as usize;
        if !self.registered.contains_key(&key) {
            let families = self.font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(font_bytes.as_ref().clone()),
                None,
            );
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                StoryError::validation("no font families registered from font bytes")
            })?;
            let family_name = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| StoryError::validation("registered font family has no name"))?
                .to_string();
            let font = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
                0,
            );
            tracing::debug!(family = %family_name, "registered font");
            self.registered.insert(
                key,
                RegisteredFont {
                    _bytes: Arc::clone(font_bytes),
                    family_name,
                    font,
                },
            );
        }
        self.registered
            .get(&key)
            .ok_or_else(|| StoryError::evaluation("font cache lost a registered font"))
    }

    /// Shape and lay out a single paragraph in bold weight.
    ///
    /// Returns the layout together with the font data to draw its glyphs with.
    pub(crate) fn layout_bold(
        &mut self,
        text: &str,
        font_bytes: &Arc<Vec<u8>>,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> StoryResult<(parley::Layout<TextBrushRgba8>, vello_cpu::peniko::FontData)> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StoryError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let registered = self.register(font_bytes)?;
        let family_name = registered.family_name.clone();
        let font = registered.font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok((layout, font))
    }
}

/// Anchor transform for a text label: translate to the resolved position, then rotate, then scale.
pub fn text_transform(element: &TextElement, canvas: Canvas) -> Affine {
    anchor_transform(
        element.position.x,
        element.position.y,
        element.rotation,
        element.scale,
        canvas,
    )
}

/// Shared placement convention for text labels and stickers.
///
/// `x_pct`/`y_pct` are percentages of the canvas; `rotation_deg` rotates around the anchor.
pub fn anchor_transform(
    x_pct: f64,
    y_pct: f64,
    rotation_deg: f64,
    scale: f64,
    canvas: Canvas,
) -> Affine {
    let abs = Vec2::new(
        x_pct / 100.0 * canvas.width_f64(),
        y_pct / 100.0 * canvas.height_f64(),
    );
    Affine::translate(abs) * Affine::rotate(rotation_deg.to_radians()) * Affine::scale(scale)
}

/// Renders text labels with a blurred drop shadow.
#[derive(Default)]
pub struct TextRenderer {
    engine: TextLayoutEngine,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one label onto `target`: shadow first, then the glyphs.
    pub fn render_text(
        &mut self,
        rasterizer: &mut Rasterizer,
        target: &mut Surface,
        fonts: &FontBook,
        element: &TextElement,
    ) -> StoryResult<()> {
        if element.text.trim().is_empty() {
            return Ok(());
        }
        let font_bytes = fonts.resolve(&element.font).ok_or_else(|| {
            StoryError::validation(format!(
                "text '{}' needs a font but none is configured",
                element.id
            ))
        })?;
        let color = parse_color(&element.color)?;
        let canvas = target.canvas();
        let size_px = (TEXT_SIZE_FRACTION * canvas.width_f64()) as f32;

        let (layout, font) =
            self.engine
                .layout_bold(&element.text, font_bytes, size_px, color.into())?;

        let centered = text_transform(element, canvas)
            * Affine::translate((
                -f64::from(layout.width()) / 2.0,
                -f64::from(layout.height()) / 2.0,
            ));
        let (w, h) = (target.width(), target.height());

        let shadow_xf = Affine::translate(TEXT_SHADOW_OFFSET) * centered;
        let shadow = rasterizer.render_layer(w, h, |ctx| {
            draw_layout(ctx, &layout, &font, shadow_xf, Some(TEXT_SHADOW_COLOR));
            Ok(())
        })?;
        let shadow = gaussian_blur_surface(&shadow, TEXT_SHADOW_BLUR / 2.0)?;
        composite_surface(target, &shadow, 1.0, CompositeOp::SourceOver)?;

        let glyphs = rasterizer.render_layer(w, h, |ctx| {
            draw_layout(ctx, &layout, &font, centered, None);
            Ok(())
        })?;
        composite_surface(target, &glyphs, 1.0, CompositeOp::SourceOver)?;

        tracing::debug!(id = %element.id, size_px, "rendered text layer");
        Ok(())
    }
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    transform: Affine,
    paint_override: Option<Rgba8>,
) {
    ctx.set_transform(affine_to_cpu(transform));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let paint = match paint_override {
                Some(c) => c.to_cpu_color(),
                None => {
                    let brush = run.style().brush;
                    vello_cpu::peniko::Color::from_rgba8(brush.r, brush.g, brush.b, brush.a)
                }
            };
            ctx.set_paint(paint);

            let mut x = run.offset();
            let y = run.baseline();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .glyphs()
                .map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    glyph
                })
                .collect();
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs.into_iter());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
