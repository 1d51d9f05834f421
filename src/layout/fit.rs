use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Rect};

/// Placement of media inside a canvas, in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FitRect {
    /// Return `true` when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Transform mapping a `src_w`x`src_h` image onto this rectangle.
    pub fn to_affine(self, src_w: f64, src_h: f64) -> Affine {
        if !(src_w > 0.0 && src_h > 0.0) {
            return Affine::scale(0.0);
        }
        Affine::translate((self.x, self.y))
            * Affine::scale_non_uniform(self.width / src_w, self.height / src_h)
    }
}

/// Fit `media_w`x`media_h` inside `canvas_w`x`canvas_h`, preserving aspect ratio and centering.
///
/// Media relatively wider than the canvas spans the full canvas width; otherwise it spans the full
/// height. Non-positive or non-finite inputs yield an empty rectangle at the origin.
pub fn get_fit_dimensions(media_w: f64, media_h: f64, canvas_w: f64, canvas_h: f64) -> FitRect {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(media_w) && valid(media_h) && valid(canvas_w) && valid(canvas_h)) {
        return FitRect::default();
    }

    let media_ratio = media_w / media_h;
    let canvas_ratio = canvas_w / canvas_h;

    let (width, height) = if media_ratio > canvas_ratio {
        (canvas_w, canvas_w / media_ratio)
    } else {
        (canvas_h * media_ratio, canvas_h)
    };

    FitRect {
        x: (canvas_w - width) / 2.0,
        y: (canvas_h - height) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
