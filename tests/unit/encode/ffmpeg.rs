use super::*;

fn cfg(codec: VideoCodec) -> RecorderConfig {
    RecorderConfig {
        width: 16,
        height: 16,
        fps: 30,
        codec,
    }
}

#[test]
fn args_select_codec_and_stream_to_stdout() {
    let webm = ffmpeg_args(&cfg(VideoCodec::Vp9Webm));
    assert!(webm.windows(2).any(|w| w == ["-c:v", "libvpx-vp9"]));
    assert!(webm.windows(2).any(|w| w == ["-s", "16x16"]));
    assert_eq!(webm.last().map(String::as_str), Some("pipe:1"));

    let mp4 = ffmpeg_args(&cfg(VideoCodec::H264Mp4));
    assert!(mp4.windows(2).any(|w| w == ["-movflags", "frag_keyframe+empty_moov"]));
    assert!(mp4.windows(2).any(|w| w == ["-f", "mp4"]));
}

#[test]
fn push_before_begin_fails() {
    let mut rec = FfmpegRecorder::new();
    let frame = Surface::new(16, 16).unwrap();
    assert!(matches!(rec.push_frame(0, &frame), Err(StoryError::Encoding(_))));
    assert!(rec.finish().is_err());
}

#[test]
fn records_a_short_webm_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut rec = FfmpegRecorder::new();
    if rec.begin(&cfg(VideoCodec::Vp9Webm)).is_err() {
        return;
    }
    let mut frame = Surface::new(16, 16).unwrap();
    frame.fill(crate::foundation::core::Rgba8Premul::from_straight_rgba(200, 10, 10, 255));
    for i in 0..5 {
        rec.push_frame(i, &frame).unwrap();
    }
    let Ok(chunks) = rec.finish() else {
        // Builds without libvpx fail at encode time.
        return;
    };
    let bytes: Vec<u8> = chunks.concat();
    assert!(bytes.starts_with(&[0x1a, 0x45, 0xdf, 0xa3]), "webm/EBML magic");
}

#[test]
fn abort_kills_the_encoder() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut rec = FfmpegRecorder::new();
    if rec.begin(&cfg(VideoCodec::H264Mp4)).is_err() {
        return;
    }
    rec.abort();
    assert!(rec.finish().is_err());
}
