use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, clamp01};
use crate::foundation::error::{StoryError, StoryResult};
use crate::scene::color::ERASE_SENTINEL;

/// Kind of media a slide is built around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Photo,
    /// Video clip.
    Video,
}

/// Reference to the user-selected media of a slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    /// Opaque locator (file path, `file://` URL, or host-defined key).
    pub url: String,
    /// Media kind, which selects the render pipeline.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Raw bytes of the original file when the host already holds them in memory.
    #[serde(skip)]
    pub source_file: Option<Arc<Vec<u8>>>,
}

impl MediaReference {
    /// Reference a photo by locator.
    pub fn photo(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Photo,
            source_file: None,
        }
    }

    /// Reference a video by locator.
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Video,
            source_file: None,
        }
    }

    /// Attach in-memory source bytes.
    pub fn with_source_file(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.source_file = Some(Arc::new(bytes.into()));
        self
    }
}

fn one() -> f64 {
    1.0
}

/// A positioned text label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Stable element id.
    pub id: String,
    /// Label text.
    pub text: String,
    /// Font family key; unknown keys fall back to the default font.
    #[serde(default)]
    pub font: String,
    /// Fill color.
    pub color: String,
    /// Anchor position as percentages of the canvas (`0..=100` on both axes).
    pub position: Point,
    /// Uniform scale, `1.0` is natural size.
    #[serde(default = "one")]
    pub scale: f64,
    /// Rotation in degrees, clockwise in canvas space.
    #[serde(default)]
    pub rotation: f64,
}

/// Brush used for a freehand stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brush {
    /// Opaque ink.
    Pen,
    /// Translucent ink.
    Highlighter,
    /// Removes ink underneath.
    Eraser,
}

/// One freehand stroke, recorded in canvas pixel space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingElement {
    /// Stable element id.
    pub id: String,
    /// Brush kind.
    pub brush: Brush,
    /// Ink color, or the `"erase"` sentinel.
    pub color: String,
    /// Polyline points in canvas pixels.
    pub points: Vec<Point>,
    /// Line width in canvas pixels.
    pub stroke_width: f64,
}

impl DrawingElement {
    /// Return `true` when this stroke cuts ink away instead of adding it.
    pub fn is_erase(&self) -> bool {
        self.brush == Brush::Eraser || self.color.trim().eq_ignore_ascii_case(ERASE_SENTINEL)
    }
}

/// An image or SVG sticker placed like a text label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerElement {
    /// Stable element id.
    pub id: String,
    /// Locator resolved through the media loader.
    pub source: String,
    /// Center position as percentages of the canvas.
    pub position: Point,
    /// Sticker width as a percentage of canvas width before `scale`.
    #[serde(default = "default_sticker_size")]
    pub size: f64,
    /// Uniform scale.
    #[serde(default = "one")]
    pub scale: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
}

fn default_sticker_size() -> f64 {
    30.0
}

/// Tilt-shift geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiltShiftMode {
    /// Disabled.
    #[default]
    None,
    /// Horizontal sharp band.
    Linear,
    /// Circular sharp region.
    Radial,
}

/// Tilt-shift parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TiltShift {
    /// Geometry of the sharp region.
    pub mode: TiltShiftMode,
    /// Blend strength in `[0, 1]`.
    #[serde(default)]
    pub intensity: f64,
}

/// Per-slide post-processing parameters. All intensities live in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryEffects {
    /// Film grain overlay.
    pub grain: f64,
    /// Darkened corners.
    pub vignette: f64,
    /// Soft glow (blur of the media layer).
    pub glow: f64,
    /// Plain blur of the media layer.
    pub blur: f64,
    /// Selective blur.
    pub tilt_shift: TiltShift,
}

impl StoryEffects {
    /// Copy with every intensity clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            grain: clamp01(self.grain),
            vignette: clamp01(self.vignette),
            glow: clamp01(self.glow),
            blur: clamp01(self.blur),
            tilt_shift: TiltShift {
                mode: self.tilt_shift.mode,
                intensity: clamp01(self.tilt_shift.intensity),
            },
        }
    }
}

/// Editing state for one slide: the sole input of the story renderer.
///
/// `texts`, `drawings` and `stickers` are in z-order: later entries draw on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySlide {
    /// Base media.
    pub media: MediaReference,
    /// Text labels.
    #[serde(default)]
    pub texts: Vec<TextElement>,
    /// Freehand strokes.
    #[serde(default)]
    pub drawings: Vec<DrawingElement>,
    /// Stickers, drawn last.
    #[serde(default)]
    pub stickers: Vec<StickerElement>,
    /// Full-strength filter descriptor, e.g. `"brightness(1.2) contrast(1.4)"`.
    #[serde(default)]
    pub filter: Option<String>,
    /// Strength applied to `filter` through interpolation.
    #[serde(default = "one")]
    pub filter_intensity: f64,
    /// Post-processing effects.
    #[serde(default)]
    pub effects: StoryEffects,
}

impl StorySlide {
    /// Slide with only base media.
    pub fn new(media: MediaReference) -> Self {
        Self {
            media,
            texts: Vec::new(),
            drawings: Vec::new(),
            stickers: Vec::new(),
            filter: None,
            filter_intensity: 1.0,
            effects: StoryEffects::default(),
        }
    }

    /// Parse a slide from JSON text.
    pub fn from_json_str(s: &str) -> StoryResult<Self> {
        serde_json::from_str(s).map_err(|e| StoryError::validation(format!("invalid slide json: {e}")))
    }

    /// Read and parse a slide JSON file.
    pub fn from_path(path: &Path) -> StoryResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read slide '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject numeric state the renderer cannot place.
    pub fn validate(&self) -> StoryResult<()> {
        if self.media.url.trim().is_empty() && self.media.source_file.is_none() {
            return Err(StoryError::validation("slide media has no locator or source bytes"));
        }
        for t in &self.texts {
            if !(t.position.x.is_finite() && t.position.y.is_finite()) {
                return Err(StoryError::validation(format!(
                    "text '{}' has a non-finite position",
                    t.id
                )));
            }
            if !t.scale.is_finite() || !t.rotation.is_finite() {
                return Err(StoryError::validation(format!(
                    "text '{}' has a non-finite scale or rotation",
                    t.id
                )));
            }
        }
        for s in &self.stickers {
            if !(s.position.x.is_finite() && s.position.y.is_finite())
                || !s.scale.is_finite()
                || !s.rotation.is_finite()
                || !s.size.is_finite()
            {
                return Err(StoryError::validation(format!(
                    "sticker '{}' has non-finite placement",
                    s.id
                )));
            }
        }
        Ok(())
    }
}

/// Kind of rendered output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Flattened still image.
    Image,
    /// Re-encoded video clip.
    Video,
}

/// Result of one render invocation. Ownership passes to the caller.
#[derive(Clone, Debug)]
pub struct RenderedStoryOutput {
    /// Encoded image or video bytes.
    pub file: Vec<u8>,
    /// Encoded square JPEG thumbnail.
    pub thumbnail: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output kind.
    pub kind: OutputKind,
    /// MIME type of `file`.
    pub mime_type: &'static str,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
