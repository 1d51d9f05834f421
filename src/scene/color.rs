use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{StoryError, StoryResult};

/// Sentinel color carried by eraser strokes.
pub const ERASE_SENTINEL: &str = "erase";

/// Straight-alpha RGBA8 color parsed from an editing-state color string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return the premultiplied form.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Scale alpha by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha_mul(self, factor: f32) -> Self {
        let a = (f32::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Parse a CSS-like color string.
///
/// Accepted forms: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a
/// small set of named colors. The [`ERASE_SENTINEL`] is not a color and is rejected here.
pub fn parse_color(s: &str) -> StoryResult<Rgba8> {
    let t = s.trim();
    if t.eq_ignore_ascii_case(ERASE_SENTINEL) {
        return Err(StoryError::validation(
            "'erase' is a stroke sentinel, not a paintable color",
        ));
    }
    if let Some(hex) = t.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| invalid(s));
    }
    let lower = t.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args).ok_or_else(|| invalid(s));
    }
    named(&lower).ok_or_else(|| invalid(s))
}

fn invalid(s: &str) -> StoryError {
    StoryError::validation(format!("invalid color \"{s}\""))
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    fn nibble(c: u8) -> Option<u8> {
        (c as char).to_digit(16).map(|d| d as u8)
    }
    let b = hex.as_bytes();
    let short = |i: usize| nibble(b[i]).map(|v| v * 17);
    let pair = |i: usize| Some(nibble(b[i])? * 16 + nibble(b[i + 1])?);
    match b.len() {
        3 => Some(Rgba8::new(short(0)?, short(1)?, short(2)?, 255)),
        4 => Some(Rgba8::new(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(Rgba8::new(pair(0)?, pair(2)?, pair(4)?, 255)),
        8 => Some(Rgba8::new(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba8> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v: f64 = p.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(p) => {
            let v: f64 = p.parse().ok()?;
            if !v.is_finite() {
                return None;
            }
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Some(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn named(name: &str) -> Option<Rgba8> {
    let c = match name {
        "black" => Rgba8::new(0, 0, 0, 255),
        "white" => Rgba8::new(255, 255, 255, 255),
        "red" => Rgba8::new(255, 0, 0, 255),
        "green" => Rgba8::new(0, 128, 0, 255),
        "blue" => Rgba8::new(0, 0, 255, 255),
        "yellow" => Rgba8::new(255, 255, 0, 255),
        "orange" => Rgba8::new(255, 165, 0, 255),
        "purple" => Rgba8::new(128, 0, 128, 255),
        "pink" => Rgba8::new(255, 192, 203, 255),
        "gray" | "grey" => Rgba8::new(128, 128, 128, 255),
        "transparent" => Rgba8::new(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/color.rs"]
mod tests;
