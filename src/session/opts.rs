use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::encode::sink::VideoCodec;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryError, StoryResult};
use crate::render::text::FontBook;
use crate::render::thumbnail::{THUMBNAIL_JPEG_QUALITY, THUMBNAIL_SIZE};

/// JPEG quality of the final still image.
pub const IMAGE_JPEG_QUALITY: f32 = 0.92;
/// Frame rate handed to the video recorder.
pub const DEFAULT_RECORDER_FPS: u32 = 30;
/// Grain seed used unless overridden.
pub const DEFAULT_GRAIN_SEED: u64 = 0x5eed_57a7;

/// Options controlling a story render.
///
/// Every field has a default; a JSON file may override any subset of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOpts {
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// Edge length of the square thumbnail.
    pub thumbnail_size: u32,
    /// JPEG quality of the still image, in `(0, 1]`.
    pub image_quality: f32,
    /// JPEG quality of the thumbnail, in `(0, 1]`.
    pub thumbnail_quality: f32,
    pub codec: VideoCodec,
    pub fps: u32,
    pub grain_seed: u64,
    /// Default font file for text layers.
    pub font: Option<PathBuf>,
    /// Additional font files keyed by the name text elements refer to.
    pub named_fonts: BTreeMap<String, PathBuf>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            width: Canvas::STORY.width,
            height: Canvas::STORY.height,
            thumbnail_size: THUMBNAIL_SIZE,
            image_quality: IMAGE_JPEG_QUALITY,
            thumbnail_quality: THUMBNAIL_JPEG_QUALITY,
            codec: VideoCodec::default(),
            fps: DEFAULT_RECORDER_FPS,
            grain_seed: DEFAULT_GRAIN_SEED,
            font: None,
            named_fonts: BTreeMap::new(),
        }
    }
}

impl RenderOpts {
    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read render options '{}'", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            StoryError::validation(format!("parse render options '{}': {e}", path.display()))
        })
    }

    /// Apply `STORYFRAME_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            let v = raw.trim().parse::<T>().ok();
            if v.is_none() {
                tracing::warn!(key, value = %raw, "ignoring unparseable override");
            }
            v
        }

        if let Some(v) = parsed(&lookup, "STORYFRAME_WIDTH") {
            self.width = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_HEIGHT") {
            self.height = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_THUMBNAIL_SIZE") {
            self.thumbnail_size = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_IMAGE_QUALITY") {
            self.image_quality = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_THUMBNAIL_QUALITY") {
            self.thumbnail_quality = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_FPS") {
            self.fps = v;
        }
        if let Some(v) = parsed(&lookup, "STORYFRAME_GRAIN_SEED") {
            self.grain_seed = v;
        }
        if let Some(raw) = lookup("STORYFRAME_CODEC") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "webm" | "vp9" | "vp9_webm" => self.codec = VideoCodec::Vp9Webm,
                "mp4" | "h264" | "h264_mp4" => self.codec = VideoCodec::H264Mp4,
                _ => tracing::warn!(value = %raw, "ignoring unknown STORYFRAME_CODEC"),
            }
        }
        if let Some(raw) = lookup("STORYFRAME_FONT").filter(|s| !s.trim().is_empty()) {
            self.font = Some(PathBuf::from(raw));
        }
        self
    }

    pub fn validate(&self) -> StoryResult<()> {
        Canvas::new(self.width, self.height)?;
        if self.thumbnail_size == 0 {
            return Err(StoryError::validation("thumbnail size must be non-zero"));
        }
        for (name, q) in [
            ("image quality", self.image_quality),
            ("thumbnail quality", self.thumbnail_quality),
        ] {
            if !(q > 0.0 && q <= 1.0) {
                return Err(StoryError::validation(format!(
                    "{name} must be in (0, 1], got {q}"
                )));
            }
        }
        if self.fps == 0 {
            return Err(StoryError::validation("recorder fps must be non-zero"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> StoryResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Read the configured font files.
    pub fn load_fonts(&self) -> StoryResult<FontBook> {
        fn read(path: &Path) -> StoryResult<Vec<u8>> {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            Ok(bytes)
        }

        let mut book = FontBook::new();
        if let Some(path) = &self.font {
            book = book.with_default(read(path)?);
        }
        for (name, path) in &self.named_fonts {
            book.insert(name.clone(), read(path)?);
        }
        Ok(book)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
