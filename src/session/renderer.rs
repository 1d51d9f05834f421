use crate::encode::image::encode_jpeg;
use crate::encode::sink::RecordingSink;
use crate::foundation::core::Canvas;
use crate::foundation::error::StoryResult;
use crate::media::loader::MediaLoader;
use crate::render::composer::FrameComposer;
use crate::render::sticker::StickerImage;
use crate::render::text::FontBook;
use crate::scene::model::{MediaKind, OutputKind, RenderedStoryOutput, StickerElement, StorySlide};
use crate::session::cancel::CancelToken;
use crate::session::opts::RenderOpts;
use crate::session::scheduler::FrameScheduler;
use crate::session::video_job::{VideoJobConfig, VideoRenderJob};

/// Renders story slides into uploadable image or video output.
///
/// Each call snapshots the slide, so the caller may keep editing its copy while a render runs.
#[derive(Clone, Debug)]
pub struct StoryRenderer {
    opts: RenderOpts,
    canvas: Canvas,
    fonts: FontBook,
}

impl StoryRenderer {
    pub fn new(opts: RenderOpts, fonts: FontBook) -> StoryResult<Self> {
        opts.validate()?;
        Ok(Self {
            canvas: opts.canvas()?,
            opts,
            fonts,
        })
    }

    /// Renderer with options from `opts` and fonts read from its font paths.
    pub fn from_opts(opts: RenderOpts) -> StoryResult<Self> {
        let fonts = opts.load_fonts()?;
        Self::new(opts, fonts)
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Render `slide`, picking the pipeline from its media kind.
    pub fn render(
        &self,
        slide: &StorySlide,
        loader: &dyn MediaLoader,
        recorder: &mut dyn RecordingSink,
        scheduler: &mut dyn FrameScheduler,
        cancel: &CancelToken,
    ) -> StoryResult<RenderedStoryOutput> {
        match slide.media.kind {
            MediaKind::Photo => self.render_image(slide, loader),
            MediaKind::Video => self.render_video(slide, loader, recorder, scheduler, cancel),
        }
    }

    /// Compose a photo slide once and encode it with its thumbnail.
    #[tracing::instrument(skip_all, fields(media = %slide.media.url))]
    pub fn render_image(
        &self,
        slide: &StorySlide,
        loader: &dyn MediaLoader,
    ) -> StoryResult<RenderedStoryOutput> {
        let slide = slide.clone();
        slide.validate()?;

        let media = loader.load_image(&slide.media)?;
        let stickers = load_stickers(&slide, loader)?;
        let mut composer = FrameComposer::prepare(
            self.canvas,
            &slide,
            &self.fonts,
            &stickers,
            self.opts.grain_seed,
        )?;
        let frame = composer.compose(&media, 0)?;

        let file = encode_jpeg(&frame, self.opts.image_quality)?;
        let thumbnail = composer.thumbnail(
            &frame,
            self.opts.thumbnail_size,
            self.opts.thumbnail_quality,
        )?;
        tracing::debug!(bytes = file.len(), thumb_bytes = thumbnail.len(), "image rendered");
        Ok(RenderedStoryOutput {
            file,
            thumbnail,
            width: self.canvas.width,
            height: self.canvas.height,
            kind: OutputKind::Image,
            mime_type: "image/jpeg",
        })
    }

    /// Replay a video slide frame by frame into `recorder`.
    ///
    /// Cancelling `cancel` stops at the next tick with [`crate::StoryError::Cancelled`].
    #[tracing::instrument(skip_all, fields(media = %slide.media.url))]
    pub fn render_video(
        &self,
        slide: &StorySlide,
        loader: &dyn MediaLoader,
        recorder: &mut dyn RecordingSink,
        scheduler: &mut dyn FrameScheduler,
        cancel: &CancelToken,
    ) -> StoryResult<RenderedStoryOutput> {
        let slide = slide.clone();
        slide.validate()?;

        let source = loader.open_video(&slide.media)?;
        let stickers = load_stickers(&slide, loader)?;
        let composer = FrameComposer::prepare(
            self.canvas,
            &slide,
            &self.fonts,
            &stickers,
            self.opts.grain_seed,
        )?;
        let job = VideoRenderJob::new(
            composer,
            source,
            recorder,
            cancel.clone(),
            VideoJobConfig {
                fps: self.opts.fps,
                codec: self.opts.codec,
                thumbnail_size: self.opts.thumbnail_size,
                thumbnail_quality: self.opts.thumbnail_quality,
            },
        );
        job.run(scheduler)
    }
}

fn load_stickers(
    slide: &StorySlide,
    loader: &dyn MediaLoader,
) -> StoryResult<Vec<(StickerElement, StickerImage)>> {
    slide
        .stickers
        .iter()
        .map(|s| Ok((s.clone(), loader.load_sticker(&s.source)?)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/session/renderer.rs"]
mod tests;
