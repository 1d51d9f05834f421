//! Storyframe composes story slides into uploadable media.
//!
//! A [`StorySlide`] describes one edited photo or video: filter, effects, freehand drawings, text
//! labels, and stickers. [`StoryRenderer`] flattens it onto a 1080x1920 canvas and returns a
//! [`RenderedStoryOutput`] holding the encoded file and a square JPEG thumbnail.
//!
//! - Photos render in a single pass to JPEG.
//! - Videos replay frame by frame through a [`FrameScheduler`] into a [`RecordingSink`], with the
//!   thumbnail taken from the first frame. A [`CancelToken`] stops the recording early.
#![forbid(unsafe_code)]

mod foundation;

/// Frame-wide post-processing passes.
pub mod effects;
/// Image encoding and video recording.
pub mod encode;
pub mod filter;
pub mod layout;
/// Media loading and decoding.
pub mod media;
pub mod render;
pub mod scene;
/// Render orchestration.
pub mod session;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{StoryError, StoryResult};

pub use crate::encode::ffmpeg::FfmpegRecorder;
pub use crate::encode::sink::{InMemoryRecorder, RecorderConfig, RecordingSink, VideoCodec};
pub use crate::filter::{FilterFn, FilterOp, apply_filter, interpolate_filter, parse_filter};
pub use crate::layout::{FitRect, get_fit_dimensions};
pub use crate::media::loader::{FsMediaLoader, MediaLoader, MemoryMediaLoader};
pub use crate::media::video::{FrameListSource, PlaybackState, VideoInfo, VideoSource};
pub use crate::render::surface::Surface;
pub use crate::render::text::FontBook;
pub use crate::scene::model::{
    Brush, DrawingElement, MediaKind, MediaReference, OutputKind, RenderedStoryOutput,
    StickerElement, StoryEffects, StorySlide, TextElement, TiltShift, TiltShiftMode,
};
pub use crate::session::cancel::CancelToken;
pub use crate::session::opts::RenderOpts;
pub use crate::session::renderer::StoryRenderer;
pub use crate::session::scheduler::{FrameScheduler, FrameTask, ImmediateScheduler, TickOutcome};
pub use crate::session::video_job::{VideoJobConfig, VideoJobState, VideoRenderJob};
