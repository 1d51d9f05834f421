use crate::foundation::error::StoryResult;
use crate::render::composite::{CompositeOp, composite_surface};
use crate::render::surface::Surface;

/// Inner gradient radius (fully transparent) as a fraction of canvas width.
pub const VIGNETTE_INNER_RADIUS: f64 = 0.5;
/// Outer gradient radius (opaque black) as a fraction of canvas width.
pub const VIGNETTE_OUTER_RADIUS: f64 = 1.1;
/// Blend strength at intensity 1.
pub const VIGNETTE_MAX_ALPHA: f64 = 0.8;

/// Radial black gradient centered on the canvas.
pub fn vignette_layer(width: u32, height: u32) -> StoryResult<Surface> {
    let mut layer = Surface::new(width, height)?;
    let w = f64::from(width);
    let (cx, cy) = (w / 2.0, f64::from(height) / 2.0);
    let r0 = VIGNETTE_INNER_RADIUS * w;
    let r1 = VIGNETTE_OUTER_RADIUS * w;

    let stride = width as usize * 4;
    for (y, row) in layer.data_mut().chunks_exact_mut(stride).enumerate() {
        let dy = y as f64 + 0.5 - cy;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let dx = x as f64 + 0.5 - cx;
            let d = (dx * dx + dy * dy).sqrt();
            let t = ((d - r0) / (r1 - r0)).clamp(0.0, 1.0);
            px[3] = (t * 255.0).round() as u8;
        }
    }
    Ok(layer)
}

/// Darken the frame edges with a multiply-composited radial gradient.
///
/// No-op unless `intensity > 0`.
pub fn apply_vignette(surface: &mut Surface, intensity: f64) -> StoryResult<()> {
    if !(intensity > 0.0) {
        return Ok(());
    }
    let layer = vignette_layer(surface.width(), surface.height())?;
    let alpha = (intensity.min(1.0) * VIGNETTE_MAX_ALPHA) as f32;
    composite_surface(surface, &layer, alpha, CompositeOp::Multiply)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
