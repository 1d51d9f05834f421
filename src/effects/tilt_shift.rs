use crate::effects::blur::gaussian_blur_surface;
use crate::foundation::error::StoryResult;
use crate::render::composite::mix_by_mask_in_place;
use crate::render::surface::Surface;
use crate::scene::model::{TiltShift, TiltShiftMode};

/// Center of the sharp band as a fraction of height.
pub const LINEAR_BAND_CENTER: f64 = 0.5;
/// Half-height of the sharp band as a fraction of height.
pub const LINEAR_BAND_HALF_HEIGHT: f64 = 0.15;
/// Transition length from sharp to blurred as a fraction of height.
pub const LINEAR_FEATHER: f64 = 0.15;
/// Sharp circle radius as a fraction of `min(width, height)`.
pub const RADIAL_RADIUS: f64 = 0.25;
/// Transition length for the radial mode as a fraction of `min(width, height)`.
pub const RADIAL_FEATHER: f64 = 0.2;
/// Blur sigma at full strength, relative to a 1080px wide canvas.
pub const TILT_SHIFT_BLUR_PX: f64 = 12.0;

fn smoothstep(a: f64, b: f64, x: f64) -> f64 {
    if x <= a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    (t * t * (3.0 - 2.0 * t)).clamp(0.0, 1.0)
}

/// Per-pixel blur weight in `[0, 1]`: `0` stays sharp, `1` is fully blurred.
pub fn tilt_shift_mask(mode: TiltShiftMode, width: u32, height: u32) -> Vec<f32> {
    let (w, h) = (f64::from(width), f64::from(height));
    let mut mask = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let fy = f64::from(y) + 0.5;
        for x in 0..width {
            let fx = f64::from(x) + 0.5;
            let m = match mode {
                TiltShiftMode::None => 0.0,
                TiltShiftMode::Linear => {
                    let d = (fy - LINEAR_BAND_CENTER * h).abs();
                    let inner = LINEAR_BAND_HALF_HEIGHT * h;
                    smoothstep(inner, inner + LINEAR_FEATHER * h, d)
                }
                TiltShiftMode::Radial => {
                    let m = w.min(h);
                    let d = ((fx - w / 2.0).powi(2) + (fy - h / 2.0).powi(2)).sqrt();
                    let inner = RADIAL_RADIUS * m;
                    smoothstep(inner, inner + RADIAL_FEATHER * m, d)
                }
            };
            mask.push(m as f32);
        }
    }
    mask
}

/// Blur the frame outside a sharp band or circle, blended by intensity.
///
/// No-op when the mode is `None` or intensity is not positive.
pub fn apply_tilt_shift(surface: &mut Surface, params: TiltShift) -> StoryResult<()> {
    if params.mode == TiltShiftMode::None || !(params.intensity > 0.0) {
        return Ok(());
    }
    let intensity = params.intensity.min(1.0);
    let sigma = TILT_SHIFT_BLUR_PX * f64::from(surface.width()) / 1080.0 * intensity;
    let blurred = gaussian_blur_surface(surface, sigma.max(0.5) as f32)?;
    let mask: Vec<f32> = tilt_shift_mask(params.mode, surface.width(), surface.height())
        .into_iter()
        .map(|m| m * intensity as f32)
        .collect();
    mix_by_mask_in_place(surface.data_mut(), blurred.data(), &mask)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tilt_shift.rs"]
mod tests;
