use crate::encode::image::encode_jpeg;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::StoryResult;
use crate::layout::fit::get_fit_dimensions;
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::raster::Rasterizer;
use crate::render::surface::Surface;

/// Edge length of the square thumbnail.
pub const THUMBNAIL_SIZE: u32 = 640;
/// JPEG quality of the encoded thumbnail.
pub const THUMBNAIL_JPEG_QUALITY: f32 = 0.8;

/// Letterbox a fully composited frame into a black `size`x`size` square.
pub fn thumbnail_surface(
    rasterizer: &mut Rasterizer,
    source: &Surface,
    size: u32,
) -> StoryResult<Surface> {
    let mut thumb = Surface::new(size, size)?;
    thumb.fill(Rgba8Premul::BLACK);

    let fit = get_fit_dimensions(
        f64::from(source.width()),
        f64::from(source.height()),
        f64::from(size),
        f64::from(size),
    );
    if fit.is_empty() {
        return Ok(thumb);
    }
    let placed = rasterizer.draw_surface(
        size,
        size,
        source,
        fit.to_affine(f64::from(source.width()), f64::from(source.height())),
    )?;
    composite_surface(&mut thumb, &placed, 1.0, CompositeOp::SourceOver)?;
    Ok(thumb)
}

/// Render and JPEG-encode a thumbnail of `source`.
pub fn generate_thumbnail(
    rasterizer: &mut Rasterizer,
    source: &Surface,
    size: u32,
    quality: f32,
) -> StoryResult<Vec<u8>> {
    let thumb = thumbnail_surface(rasterizer, source, size)?;
    encode_jpeg(&thumb, quality)
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
