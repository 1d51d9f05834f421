use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::StoryResult;
use crate::foundation::math::hash_u32;
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::surface::Surface;

/// Edge length of the repeating noise tile.
pub const GRAIN_TILE_SIZE: u32 = 128;
/// Alpha of every noise texel.
pub const GRAIN_TEXEL_ALPHA: u8 = 25;
/// Blend strength at intensity 1.
pub const GRAIN_MAX_ALPHA: f64 = 0.25;

/// Deterministic luminance noise tile for `seed`.
pub fn noise_tile(seed: u64) -> StoryResult<Surface> {
    let mut tile = Surface::new(GRAIN_TILE_SIZE, GRAIN_TILE_SIZE)?;
    let stride = GRAIN_TILE_SIZE as usize * 4;
    for (y, row) in tile.data_mut().chunks_exact_mut(stride).enumerate() {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let v = hash_u32(seed, x as u32, y as u32) as u8;
            let p = Rgba8Premul::from_straight_rgba(v, v, v, GRAIN_TEXEL_ALPHA);
            px.copy_from_slice(&p.to_array());
        }
    }
    Ok(tile)
}

/// Repeat `tile` across a `width`x`height` layer.
pub fn tile_across(tile: &Surface, width: u32, height: u32) -> StoryResult<Surface> {
    let mut out = Surface::new(width, height)?;
    let tw = tile.width() as usize;
    let th = tile.height() as usize;
    let stride = width as usize * 4;
    for (y, row) in out.data_mut().chunks_exact_mut(stride).enumerate() {
        let ty = y % th;
        let src_row = &tile.data()[ty * tw * 4..(ty + 1) * tw * 4];
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let tx = (x % tw) * 4;
            px.copy_from_slice(&src_row[tx..tx + 4]);
        }
    }
    Ok(out)
}

/// Overlay tiled film grain.
///
/// No-op unless `intensity > 0`. The same `seed` always yields the same pixels.
pub fn apply_grain(surface: &mut Surface, intensity: f64, seed: u64) -> StoryResult<()> {
    if !(intensity > 0.0) {
        return Ok(());
    }
    let tile = noise_tile(seed)?;
    let layer = tile_across(&tile, surface.width(), surface.height())?;
    let alpha = (intensity.min(1.0) * GRAIN_MAX_ALPHA) as f32;
    composite_surface(surface, &layer, alpha, CompositeOp::Overlay)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
