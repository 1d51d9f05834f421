use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{StoryError, StoryResult};
use crate::media::decode::decode_image;
use crate::media::ffmpeg::FfmpegVideoSource;
use crate::media::video::{FrameListSource, VideoSource};
use crate::render::sticker::StickerImage;
use crate::render::surface::Surface;
use crate::scene::model::MediaReference;

/// Resolves media locators to bytes, decoded images, and playable videos.
///
/// Hosts implement [`MediaLoader::load_bytes`] and [`MediaLoader::open_video`]; image and sticker
/// decoding is shared.
pub trait MediaLoader {
    /// Raw bytes behind `locator`.
    fn load_bytes(&self, locator: &str) -> StoryResult<Arc<Vec<u8>>>;

    /// Open the video behind `media` for frame-by-frame playback.
    fn open_video(&self, media: &MediaReference) -> StoryResult<Box<dyn VideoSource>>;

    /// Decode the slide photo, preferring in-memory source bytes over the locator.
    fn load_image(&self, media: &MediaReference) -> StoryResult<Surface> {
        match &media.source_file {
            Some(bytes) => decode_image(bytes),
            None => decode_image(&self.load_bytes(&media.url)?),
        }
    }

    /// Decode sticker artwork.
    fn load_sticker(&self, locator: &str) -> StoryResult<StickerImage> {
        let bytes = self.load_bytes(locator)?;
        StickerImage::decode(locator, &bytes)
    }
}

/// Loads media from the local filesystem.
///
/// Absolute paths and `file://` URLs are read as-is; relative locators resolve under `root`
/// and must not escape it.
#[derive(Clone, Debug)]
pub struct FsMediaLoader {
    root: PathBuf,
}

impl FsMediaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for `locator`.
    pub fn resolve(&self, locator: &str) -> StoryResult<PathBuf> {
        let locator = locator.strip_prefix("file://").unwrap_or(locator);
        if Path::new(locator).is_absolute() {
            return Ok(PathBuf::from(locator));
        }
        Ok(self.root.join(normalize_rel_path(locator)?))
    }
}

impl MediaLoader for FsMediaLoader {
    fn load_bytes(&self, locator: &str) -> StoryResult<Arc<Vec<u8>>> {
        let path = self.resolve(locator)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read media bytes from '{}'", path.display()))
            .map_err(|e| StoryError::media_load(format!("{e:#}")))?;
        Ok(Arc::new(bytes))
    }

    fn open_video(&self, media: &MediaReference) -> StoryResult<Box<dyn VideoSource>> {
        let source = match &media.source_file {
            Some(bytes) => FfmpegVideoSource::from_bytes(bytes)?,
            None => FfmpegVideoSource::open(self.resolve(&media.url)?)?,
        };
        Ok(Box::new(source))
    }
}

/// In-memory loader keyed by locator.
#[derive(Clone, Debug, Default)]
pub struct MemoryMediaLoader {
    bytes: HashMap<String, Arc<Vec<u8>>>,
    videos: HashMap<String, FrameListSource>,
}

impl MemoryMediaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_bytes(&mut self, locator: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.bytes.insert(locator.into(), Arc::new(bytes.into()));
    }

    pub fn insert_video(&mut self, locator: impl Into<String>, video: FrameListSource) {
        self.videos.insert(locator.into(), video);
    }
}

impl MediaLoader for MemoryMediaLoader {
    fn load_bytes(&self, locator: &str) -> StoryResult<Arc<Vec<u8>>> {
        self.bytes
            .get(locator)
            .cloned()
            .ok_or_else(|| StoryError::media_load(format!("no media registered for '{locator}'")))
    }

    fn open_video(&self, media: &MediaReference) -> StoryResult<Box<dyn VideoSource>> {
        let video = self.videos.get(&media.url).cloned().ok_or_else(|| {
            StoryError::media_load(format!("no video registered for '{}'", media.url))
        })?;
        Ok(Box::new(video))
    }
}

/// Normalize a relative media path, rejecting absolute paths and `..` segments.
pub fn normalize_rel_path(source: &str) -> StoryResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StoryError::validation("media paths must be relative"));
    }
    let parts: Vec<&str> = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.contains(&"..") {
        return Err(StoryError::validation("media paths must not contain '..'"));
    }
    if parts.is_empty() {
        return Err(StoryError::validation("media path must contain a file name"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/media/loader.rs"]
mod tests;
