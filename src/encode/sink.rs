use serde::{Deserialize, Serialize};

use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Container and codec pairing for recorded video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// VP9 in a WebM container.
    #[default]
    Vp9Webm,
    /// H.264 in a fragmented MP4 container.
    H264Mp4,
}

impl VideoCodec {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Vp9Webm => "video/webm",
            Self::H264Mp4 => "video/mp4",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Vp9Webm => "webm",
            Self::H264Mp4 => "mp4",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: VideoCodec,
}

impl RecorderConfig {
    pub fn validate(&self) -> StoryResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StoryError::validation(
                "recorder width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(StoryError::validation("recorder fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(StoryError::validation(
                "recorder width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Captures rendered frames into container-encoded data chunks.
///
/// A sink is used for one recording: `begin`, any number of `push_frame` calls, then exactly
/// one of `finish` (returns the chunks in order) or `abort` (discards them).
pub trait RecordingSink: Send {
    fn begin(&mut self, cfg: &RecorderConfig) -> StoryResult<()>;

    fn push_frame(&mut self, frame_index: u64, frame: &Surface) -> StoryResult<()>;

    /// Stop recording and hand back every captured chunk.
    fn finish(&mut self) -> StoryResult<Vec<Vec<u8>>>;

    /// Stop recording and drop captured data.
    fn abort(&mut self);
}

/// Records frames as raw premultiplied RGBA chunks, one per frame.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecorder {
    cfg: Option<RecorderConfig>,
    chunks: Vec<Vec<u8>>,
    frame_indices: Vec<u64>,
    aborted: bool,
    finished: bool,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame indices pushed so far, in order.
    pub fn frame_indices(&self) -> &[u64] {
        &self.frame_indices
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    pub fn was_finished(&self) -> bool {
        self.finished
    }

    pub fn buffered_chunks(&self) -> usize {
        self.chunks.len()
    }
}

impl RecordingSink for InMemoryRecorder {
    fn begin(&mut self, cfg: &RecorderConfig) -> StoryResult<()> {
        cfg.validate()?;
        *self = Self {
            cfg: Some(*cfg),
            ..Self::default()
        };
        Ok(())
    }

    fn push_frame(&mut self, frame_index: u64, frame: &Surface) -> StoryResult<()> {
        let Some(cfg) = self.cfg.filter(|_| !self.finished && !self.aborted) else {
            return Err(StoryError::encoding("recorder is not recording"));
        };
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(StoryError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        self.chunks.push(frame.data().to_vec());
        self.frame_indices.push(frame_index);
        Ok(())
    }

    fn finish(&mut self) -> StoryResult<Vec<Vec<u8>>> {
        if self.cfg.is_none() || self.aborted {
            return Err(StoryError::encoding("recorder is not recording"));
        }
        self.finished = true;
        Ok(std::mem::take(&mut self.chunks))
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.chunks.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
