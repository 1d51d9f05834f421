use super::*;
use crate::encode::sink::InMemoryRecorder;
use crate::foundation::core::{Point, Rgba8Premul};
use crate::foundation::error::StoryError;
use crate::media::loader::MemoryMediaLoader;
use crate::media::video::FrameListSource;
use crate::render::surface::Surface;
use crate::scene::model::MediaReference;
use crate::session::scheduler::ImmediateScheduler;

fn opts() -> RenderOpts {
    RenderOpts {
        width: 36,
        height: 64,
        thumbnail_size: 16,
        ..RenderOpts::default()
    }
}

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn loader() -> MemoryMediaLoader {
    let mut l = MemoryMediaLoader::new();
    l.insert_bytes("photo.png", png(18, 32, [0, 180, 0, 255]));
    l.insert_bytes(
        "sq.svg",
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#0000ff"/></svg>"##.to_vec(),
    );
    let mut frame = Surface::new(18, 32).unwrap();
    frame.fill(Rgba8Premul::from_straight_rgba(200, 0, 0, 255));
    l.insert_video(
        "clip.mp4",
        FrameListSource::new(vec![frame.clone(), frame], 30.0).unwrap(),
    );
    l
}

#[test]
fn image_render_returns_jpeg_and_thumbnail() {
    let r = StoryRenderer::new(opts(), FontBook::new()).unwrap();
    let out = r
        .render_image(&StorySlide::new(MediaReference::photo("photo.png")), &loader())
        .unwrap();
    assert_eq!(out.kind, OutputKind::Image);
    assert_eq!(out.mime_type, "image/jpeg");
    assert_eq!((out.width, out.height), (36, 64));
    let img = image::load_from_memory(&out.file).unwrap();
    assert_eq!((img.width(), img.height()), (36, 64));
    let thumb = image::load_from_memory(&out.thumbnail).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (16, 16));
}

#[test]
fn stickers_are_drawn_last() {
    let mut slide = StorySlide::new(MediaReference::photo("photo.png"));
    slide.stickers.push(crate::scene::model::StickerElement {
        id: "s".to_owned(),
        source: "sq.svg".to_owned(),
        position: Point::new(50.0, 50.0),
        size: 50.0,
        scale: 1.0,
        rotation: 0.0,
    });
    let r = StoryRenderer::new(opts(), FontBook::new()).unwrap();
    let out = r.render_image(&slide, &loader()).unwrap();
    let img = image::load_from_memory(&out.file).unwrap().to_rgb8();
    let px = img.get_pixel(18, 32);
    assert!(px[2] > 180 && px[1] < 80, "{px:?}");
}

#[test]
fn missing_media_is_a_load_error() {
    let r = StoryRenderer::new(opts(), FontBook::new()).unwrap();
    let err = r
        .render_image(&StorySlide::new(MediaReference::photo("nope.png")), &loader())
        .unwrap_err();
    assert!(matches!(err, StoryError::MediaLoad(_)));
}

#[test]
fn render_dispatches_on_media_kind() {
    let r = StoryRenderer::new(opts(), FontBook::new()).unwrap();
    let mut rec = InMemoryRecorder::new();
    let out = r
        .render(
            &StorySlide::new(MediaReference::video("clip.mp4")),
            &loader(),
            &mut rec,
            &mut ImmediateScheduler::new(),
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(out.kind, OutputKind::Video);
    assert_eq!(out.mime_type, "video/webm");
    assert_eq!(rec.frame_indices(), &[0, 1]);
}

#[test]
fn cancelled_video_render_returns_no_output() {
    let r = StoryRenderer::new(opts(), FontBook::new()).unwrap();
    let mut rec = InMemoryRecorder::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = r
        .render_video(
            &StorySlide::new(MediaReference::video("clip.mp4")),
            &loader(),
            &mut rec,
            &mut ImmediateScheduler::new(),
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, StoryError::Cancelled));
    assert!(rec.was_aborted());
}

#[test]
fn invalid_options_are_rejected() {
    let bad = RenderOpts {
        image_quality: 2.0,
        ..RenderOpts::default()
    };
    assert!(StoryRenderer::new(bad, FontBook::new()).is_err());
}
