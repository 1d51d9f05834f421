use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Kernel radii are capped so very large blur requests stay bounded.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// Kernel radius covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    ((sigma * 3.0).ceil() as u32).min(MAX_BLUR_RADIUS)
}

/// Gaussian blur where `blur_px` is the standard deviation, as in a CSS `blur()` length.
pub fn gaussian_blur_surface(src: &Surface, blur_px: f32) -> StoryResult<Surface> {
    let radius = radius_for_sigma(blur_px);
    if radius == 0 {
        return Ok(src.clone());
    }
    let out = blur_rgba8_premul(src.data(), src.width(), src.height(), radius, blur_px)?;
    Surface::from_premul(src.width(), src.height(), out)
}

pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> StoryResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StoryError::evaluation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(StoryError::evaluation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> StoryResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StoryError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(StoryError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|&wf| (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
