use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Map a `(0, 1]` quality factor onto the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality_percent(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    ((quality * 100.0).round() as i32).clamp(1, 100) as u8
}

/// Encode `surface` as JPEG, flattening any transparency over black.
pub fn encode_jpeg(surface: &Surface, quality: f32) -> StoryResult<Vec<u8>> {
    let rgb = flatten_premul_to_rgb8(surface.data(), [0, 0, 0])?;
    let mut out = Vec::new();
    {
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut out,
            jpeg_quality_percent(quality),
        );
        encoder
            .encode(
                &rgb,
                surface.width(),
                surface.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| StoryError::encoding(format!("jpeg encode failed: {e}")))?;
    }
    if out.is_empty() {
        return Err(StoryError::encoding("jpeg encoder produced no bytes"));
    }
    Ok(out)
}

/// Flatten premultiplied RGBA8 over an opaque background, writing opaque RGBA8.
pub fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8], bg_rgb: [u8; 3]) -> StoryResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StoryError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let [r, g, b] = flatten_px(s, bg_rgb);
        d.copy_from_slice(&[r, g, b, 255]);
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background into packed RGB8.
pub fn flatten_premul_to_rgb8(src: &[u8], bg_rgb: [u8; 3]) -> StoryResult<Vec<u8>> {
    if !src.len().is_multiple_of(4) {
        return Err(StoryError::validation("rgba8 buffer length must be a multiple of 4"));
    }
    let mut out = Vec::with_capacity(src.len() / 4 * 3);
    for s in src.chunks_exact(4) {
        out.extend_from_slice(&flatten_px(s, bg_rgb));
    }
    Ok(out)
}

fn flatten_px(s: &[u8], bg: [u8; 3]) -> [u8; 3] {
    let a = u16::from(s[3]);
    if a == 255 {
        return [s[0], s[1], s[2]];
    }
    let inv = 255u16 - a;
    let ch = |c: u8, b: u8| (u16::from(c) + mul_div255(u16::from(b), inv)).min(255) as u8;
    [ch(s[0], bg[0]), ch(s[1], bg[1]), ch(s[2], bg[2])]
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image.rs"]
mod tests;
