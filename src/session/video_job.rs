use crate::encode::sink::{RecorderConfig, RecordingSink, VideoCodec};
use crate::foundation::error::{StoryError, StoryResult};
use crate::media::video::{PlaybackState, VideoSource};
use crate::render::composer::FrameComposer;
use crate::scene::model::{OutputKind, RenderedStoryOutput};
use crate::session::cancel::CancelToken;
use crate::session::scheduler::{FrameScheduler, FrameTask, TickOutcome};

/// Lifecycle of a video render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoJobState {
    Idle,
    /// Waiting for the source to become playable and the recorder to start.
    Loading,
    /// Frame loop running.
    Recording,
    /// Playback ended or paused; the recorder has not been flushed yet.
    Stopped,
    Complete,
    Cancelled,
    Failed,
}

/// Output settings for a [`VideoRenderJob`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoJobConfig {
    pub fps: u32,
    pub codec: VideoCodec,
    pub thumbnail_size: u32,
    pub thumbnail_quality: f32,
}

/// Per-frame video render: pulls frames from a [`VideoSource`], composes them, and feeds the
/// recorder until playback stops.
///
/// The thumbnail is taken from the first composed frame. Any error or cancellation aborts the
/// recorder so captured chunks are dropped.
pub struct VideoRenderJob<'a> {
    composer: FrameComposer,
    source: Box<dyn VideoSource>,
    recorder: &'a mut dyn RecordingSink,
    cancel: CancelToken,
    cfg: VideoJobConfig,
    state: VideoJobState,
    thumbnail: Option<Vec<u8>>,
    frames_rendered: u64,
}

impl std::fmt::Debug for VideoRenderJob<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoRenderJob")
            .field("state", &self.state)
            .field("frames_rendered", &self.frames_rendered)
            .field("has_thumbnail", &self.thumbnail.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> VideoRenderJob<'a> {
    pub fn new(
        composer: FrameComposer,
        source: Box<dyn VideoSource>,
        recorder: &'a mut dyn RecordingSink,
        cancel: CancelToken,
        cfg: VideoJobConfig,
    ) -> Self {
        Self {
            composer,
            source,
            recorder,
            cancel,
            cfg,
            state: VideoJobState::Idle,
            thumbnail: None,
            frames_rendered: 0,
        }
    }

    pub fn state(&self) -> VideoJobState {
        self.state
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Encoded thumbnail, once the first frame was rendered.
    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    /// Wait for the source, start the recorder, then start playback.
    pub fn start(&mut self) -> StoryResult<()> {
        if self.state != VideoJobState::Idle {
            return Err(StoryError::validation(format!(
                "video job cannot start from state {:?}",
                self.state
            )));
        }
        self.state = VideoJobState::Loading;
        if let Err(e) = self.source.wait_until_playable() {
            self.state = VideoJobState::Failed;
            return Err(e);
        }

        let canvas = self.composer.canvas();
        let rec_cfg = RecorderConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.cfg.fps,
            codec: self.cfg.codec,
        };
        if let Err(e) = self.recorder.begin(&rec_cfg) {
            self.state = VideoJobState::Failed;
            return Err(e);
        }
        if let Err(e) = self.source.play() {
            return Err(self.fail(e));
        }
        self.state = VideoJobState::Recording;
        let info = self.source.info();
        tracing::debug!(
            src_w = info.width,
            src_h = info.height,
            src_fps = info.fps,
            "video recording started"
        );
        Ok(())
    }

    fn fail(&mut self, err: StoryError) -> StoryError {
        self.recorder.abort();
        self.state = match err {
            StoryError::Cancelled => VideoJobState::Cancelled,
            _ => VideoJobState::Failed,
        };
        err
    }

    fn render_next(&mut self) -> StoryResult<TickOutcome> {
        if matches!(
            self.source.state(),
            PlaybackState::Paused | PlaybackState::Ended
        ) {
            self.state = VideoJobState::Stopped;
            return Ok(TickOutcome::Done);
        }
        let Some(media) = self.source.next_frame()? else {
            self.state = VideoJobState::Stopped;
            return Ok(TickOutcome::Done);
        };

        let idx = self.frames_rendered;
        let frame = self.composer.compose(&media, idx)?;
        if self.thumbnail.is_none() {
            self.thumbnail = Some(self.composer.thumbnail(
                &frame,
                self.cfg.thumbnail_size,
                self.cfg.thumbnail_quality,
            )?);
        }
        self.recorder.push_frame(idx, &frame)?;
        self.frames_rendered += 1;
        Ok(TickOutcome::Continue)
    }

    /// Flush the recorder and assemble the output.
    pub fn finish(mut self) -> StoryResult<RenderedStoryOutput> {
        if self.state != VideoJobState::Stopped {
            let err = StoryError::validation(format!(
                "video job cannot finish from state {:?}",
                self.state
            ));
            return Err(self.fail(err));
        }
        let Some(thumbnail) = self.thumbnail.take() else {
            return Err(self.fail(StoryError::EmptyVideo));
        };
        let chunks = match self.recorder.finish() {
            Ok(chunks) => chunks,
            Err(e) => return Err(self.fail(e)),
        };
        let file = chunks.concat();
        if file.is_empty() {
            self.state = VideoJobState::Failed;
            return Err(StoryError::encoding("recorder produced no data"));
        }

        self.state = VideoJobState::Complete;
        let canvas = self.composer.canvas();
        tracing::debug!(
            frames = self.frames_rendered,
            chunks = chunks.len(),
            bytes = file.len(),
            "video recording complete"
        );
        Ok(RenderedStoryOutput {
            file,
            thumbnail,
            width: canvas.width,
            height: canvas.height,
            kind: OutputKind::Video,
            mime_type: self.cfg.codec.mime_type(),
        })
    }

    /// Start, drive the frame loop on `scheduler`, and finish.
    #[tracing::instrument(skip_all, fields(codec = ?self.cfg.codec))]
    pub fn run(mut self, scheduler: &mut dyn FrameScheduler) -> StoryResult<RenderedStoryOutput> {
        if self.state == VideoJobState::Idle {
            self.start()?;
        }
        if let Err(e) = scheduler.run(&mut self) {
            if !matches!(
                self.state,
                VideoJobState::Failed | VideoJobState::Cancelled
            ) {
                return Err(self.fail(e));
            }
            return Err(e);
        }
        self.finish()
    }
}

impl FrameTask for VideoRenderJob<'_> {
    /// One frame of the loop.
    ///
    /// Starts the job on the first call if needed. Checks cancellation before touching the source.
    fn tick(&mut self) -> StoryResult<TickOutcome> {
        match self.state {
            VideoJobState::Idle => self.start()?,
            VideoJobState::Recording => {}
            _ => return Ok(TickOutcome::Done),
        }
        if self.cancel.is_cancelled() {
            tracing::debug!(frames = self.frames_rendered, "video render cancelled");
            return Err(self.fail(StoryError::Cancelled));
        }
        self.render_next().map_err(|e| self.fail(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/video_job.rs"]
mod tests;
