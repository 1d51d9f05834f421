use super::*;
use crate::encode::sink::InMemoryRecorder;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::media::video::FrameListSource;
use crate::render::surface::Surface;
use crate::render::text::FontBook;
use crate::scene::model::{MediaReference, StorySlide};
use crate::session::scheduler::ImmediateScheduler;

fn cfg() -> VideoJobConfig {
    VideoJobConfig {
        fps: 30,
        codec: VideoCodec::Vp9Webm,
        thumbnail_size: 16,
        thumbnail_quality: 0.8,
    }
}

fn composer() -> FrameComposer {
    let slide = StorySlide::new(MediaReference::video("clip"));
    FrameComposer::prepare(Canvas::new(8, 16).unwrap(), &slide, &FontBook::new(), &[], 0)
        .unwrap()
}

fn frames(colors: &[[u8; 4]]) -> Vec<Surface> {
    colors
        .iter()
        .map(|c| {
            let mut s = Surface::new(4, 8).unwrap();
            s.fill(Rgba8Premul::from_straight_rgba(c[0], c[1], c[2], c[3]));
            s
        })
        .collect()
}

fn source(n: usize) -> Box<dyn VideoSource> {
    let colors: Vec<[u8; 4]> = (0..n).map(|i| [(i * 40) as u8, 0, 0, 255]).collect();
    Box::new(FrameListSource::new(frames(&colors), 30.0).unwrap())
}

#[test]
fn walks_idle_recording_stopped_complete() {
    let mut rec = InMemoryRecorder::new();
    let mut job = VideoRenderJob::new(composer(), source(3), &mut rec, CancelToken::new(), cfg());
    assert_eq!(job.state(), VideoJobState::Idle);

    assert_eq!(job.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(job.state(), VideoJobState::Recording);
    assert!(job.thumbnail().is_some(), "thumbnail captured on the first frame");
    let first_thumb = job.thumbnail().map(<[u8]>::to_vec);

    while job.tick().unwrap() == TickOutcome::Continue {}
    assert_eq!(job.state(), VideoJobState::Stopped);
    assert_eq!(job.frames_rendered(), 3);
    assert_eq!(job.thumbnail().map(<[u8]>::to_vec), first_thumb);

    let out = job.finish().unwrap();
    assert_eq!(out.kind, OutputKind::Video);
    assert_eq!((out.width, out.height), (8, 16));
    assert_eq!(out.mime_type, "video/webm");
    assert_eq!(out.file.len(), 3 * 8 * 16 * 4);
    assert_eq!(Some(out.thumbnail), first_thumb);
    assert_eq!(rec.frame_indices(), &[0, 1, 2]);
}

#[test]
fn thumbnail_reflects_first_frame_not_last() {
    let mut rec = InMemoryRecorder::new();
    let src = Box::new(
        FrameListSource::new(frames(&[[255, 0, 0, 255], [0, 0, 255, 255]]), 30.0).unwrap(),
    );
    let job = VideoRenderJob::new(composer(), src, &mut rec, CancelToken::new(), cfg());
    let out = job.run(&mut ImmediateScheduler::new()).unwrap();
    let thumb = image::load_from_memory(&out.thumbnail).unwrap().to_rgb8();
    let px = thumb.get_pixel(8, 8);
    assert!(px[0] > 200 && px[2] < 60, "{px:?}");
}

#[test]
fn zero_frames_is_an_empty_video_error() {
    let mut rec = InMemoryRecorder::new();
    let job = VideoRenderJob::new(composer(), source(0), &mut rec, CancelToken::new(), cfg());
    let err = job.run(&mut ImmediateScheduler::new()).unwrap_err();
    assert!(matches!(err, StoryError::EmptyVideo));
    assert!(rec.was_aborted());
}

#[test]
fn pausing_stops_the_recording() {
    let mut rec = InMemoryRecorder::new();
    let colors = [[10, 10, 10, 255]; 5];
    let src = Box::new(
        FrameListSource::new(frames(&colors), 30.0)
            .unwrap()
            .with_pause_after(2),
    );
    let job = VideoRenderJob::new(composer(), src, &mut rec, CancelToken::new(), cfg());
    let out = job.run(&mut ImmediateScheduler::new()).unwrap();
    assert_eq!(out.file.len(), 2 * 8 * 16 * 4);
}

#[test]
fn cancellation_discards_captured_chunks() {
    let mut rec = InMemoryRecorder::new();
    let cancel = CancelToken::new();
    let mut job = VideoRenderJob::new(composer(), source(5), &mut rec, cancel.clone(), cfg());
    assert_eq!(job.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(job.tick().unwrap(), TickOutcome::Continue);
    cancel.cancel();
    assert!(matches!(job.tick().unwrap_err(), StoryError::Cancelled));
    assert_eq!(job.state(), VideoJobState::Cancelled);
    assert_eq!(job.tick().unwrap(), TickOutcome::Done);
    assert!(matches!(job.finish().unwrap_err(), StoryError::Validation(_)));
    assert!(rec.was_aborted());
    assert_eq!(rec.buffered_chunks(), 0);
}

#[test]
fn finish_before_stop_is_rejected() {
    let mut rec = InMemoryRecorder::new();
    let mut job = VideoRenderJob::new(composer(), source(3), &mut rec, CancelToken::new(), cfg());
    job.tick().unwrap();
    assert!(matches!(job.finish().unwrap_err(), StoryError::Validation(_)));
    assert!(rec.was_aborted());
}

#[test]
fn start_twice_is_rejected() {
    let mut rec = InMemoryRecorder::new();
    let mut job = VideoRenderJob::new(composer(), source(1), &mut rec, CancelToken::new(), cfg());
    job.start().unwrap();
    assert!(job.start().is_err());
}
