use std::sync::Arc;

use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Decode an encoded raster image (PNG, JPEG, ...) into a premultiplied surface.
pub fn decode_image(bytes: &[u8]) -> StoryResult<Surface> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StoryError::media_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Surface::from_straight_rgba8(width, height, rgba.into_raw())
        .map_err(|e| StoryError::media_load(format!("decoded image is unusable: {e}")))
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> StoryResult<Arc<usvg::Tree>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| StoryError::media_load(format!("parse svg tree: {e}")))?;
    Ok(Arc::new(tree))
}

/// Return `true` when `bytes` look like an SVG document rather than a raster image.
pub fn looks_like_svg(locator: &str, bytes: &[u8]) -> bool {
    if locator.to_ascii_lowercase().ends_with(".svg") {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/media/decode.rs"]
mod tests;
