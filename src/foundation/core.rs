use crate::foundation::error::{StoryError, StoryResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Portrait story canvas used for final renders.
    pub const STORY: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas.
    ///
    /// Both dimensions must be non-zero and fit the `u16` range used by the rasterizer.
    pub fn new(width: u32, height: u32) -> StoryResult<Self> {
        if width == 0 || height == 0 {
            return Err(StoryError::validation("canvas width/height must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(StoryError::validation(format!(
                "canvas {width}x{height} exceeds the rasterizer limit of {}x{}",
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Clamp `x` into `[0, 1]`. `NaN` maps to `0`.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Opaque black, the letterbox color.
    pub const BLACK: Rgba8Premul = Rgba8Premul {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
