use std::sync::Arc;

use crate::foundation::error::{StoryError, StoryResult};
use crate::render::surface::Surface;

/// Native properties of an opened video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Source frame rate; `0` when unknown.
    pub fps: f64,
    pub duration_sec: f64,
}

/// Playback clock state as seen by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Opened but not started.
    Ready,
    Playing,
    Paused,
    Ended,
}

/// A decodable video the renderer can pull frames from.
///
/// The frame loop calls [`VideoSource::next_frame`] once per tick while the state is
/// [`PlaybackState::Playing`]; returning `None` means the clip ended.
pub trait VideoSource: Send {
    fn info(&self) -> VideoInfo;

    /// Block until frames can be decoded.
    fn wait_until_playable(&mut self) -> StoryResult<()>;

    /// Start the playback clock.
    fn play(&mut self) -> StoryResult<()>;

    fn state(&self) -> PlaybackState;

    /// Frame for the current tick, advancing the clock.
    fn next_frame(&mut self) -> StoryResult<Option<Arc<Surface>>>;
}

/// Video backed by pre-decoded frames.
///
/// Useful for hosts that decode elsewhere and for deterministic tests. `pause_after` simulates the
/// viewer pausing playback once that many frames were shown.
#[derive(Clone, Debug)]
pub struct FrameListSource {
    info: VideoInfo,
    frames: Vec<Arc<Surface>>,
    cursor: usize,
    state: PlaybackState,
    pause_after: Option<usize>,
}

impl FrameListSource {
    /// Build a source from frames that all share the same size.
    pub fn new(frames: Vec<Surface>, fps: f64) -> StoryResult<Self> {
        let (width, height) = match frames.first() {
            Some(f) => (f.width(), f.height()),
            None => (1, 1),
        };
        if frames
            .iter()
            .any(|f| f.width() != width || f.height() != height)
        {
            return Err(StoryError::media_load("video frames differ in size"));
        }
        let duration_sec = if fps > 0.0 {
            frames.len() as f64 / fps
        } else {
            0.0
        };
        Ok(Self {
            info: VideoInfo {
                width,
                height,
                fps,
                duration_sec,
            },
            frames: frames.into_iter().map(Arc::new).collect(),
            cursor: 0,
            state: PlaybackState::Ready,
            pause_after: None,
        })
    }

    /// Pause playback after `n` frames were returned.
    pub fn with_pause_after(mut self, n: usize) -> Self {
        self.pause_after = Some(n);
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl VideoSource for FrameListSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn wait_until_playable(&mut self) -> StoryResult<()> {
        Ok(())
    }

    fn play(&mut self) -> StoryResult<()> {
        if self.state == PlaybackState::Ready {
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn next_frame(&mut self) -> StoryResult<Option<Arc<Surface>>> {
        if self.state != PlaybackState::Playing {
            return Ok(None);
        }
        let Some(frame) = self.frames.get(self.cursor).cloned() else {
            self.state = PlaybackState::Ended;
            return Ok(None);
        };
        self.cursor += 1;
        if self.pause_after.is_some_and(|n| self.cursor >= n) {
            self.state = PlaybackState::Paused;
        } else if self.cursor >= self.frames.len() {
            self.state = PlaybackState::Ended;
        }
        Ok(Some(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/video.rs"]
mod tests;
