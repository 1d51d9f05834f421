use super::*;

fn cfg() -> RecorderConfig {
    RecorderConfig {
        width: 4,
        height: 2,
        fps: 30,
        codec: VideoCodec::default(),
    }
}

#[test]
fn codec_defaults_to_webm() {
    assert_eq!(VideoCodec::default(), VideoCodec::Vp9Webm);
    assert_eq!(VideoCodec::Vp9Webm.mime_type(), "video/webm");
    assert_eq!(VideoCodec::H264Mp4.mime_type(), "video/mp4");
    assert_eq!(VideoCodec::H264Mp4.extension(), "mp4");
}

#[test]
fn config_rejects_odd_or_zero_sizes() {
    assert!(cfg().validate().is_ok());
    for bad in [
        RecorderConfig { width: 3, ..cfg() },
        RecorderConfig { height: 0, ..cfg() },
        RecorderConfig { fps: 0, ..cfg() },
    ] {
        assert!(matches!(bad.validate(), Err(StoryError::Validation(_))));
    }
}

#[test]
fn in_memory_recorder_keeps_one_chunk_per_frame() {
    let mut rec = InMemoryRecorder::new();
    rec.begin(&cfg()).unwrap();
    let frame = Surface::new(4, 2).unwrap();
    rec.push_frame(0, &frame).unwrap();
    rec.push_frame(1, &frame).unwrap();
    let chunks = rec.finish().unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.len() == 32));
    assert_eq!(rec.frame_indices(), &[0, 1]);
    assert!(rec.was_finished());
}

#[test]
fn abort_discards_chunks() {
    let mut rec = InMemoryRecorder::new();
    rec.begin(&cfg()).unwrap();
    rec.push_frame(0, &Surface::new(4, 2).unwrap()).unwrap();
    rec.abort();
    assert!(rec.was_aborted());
    assert_eq!(rec.buffered_chunks(), 0);
    assert!(rec.finish().is_err());
}

#[test]
fn push_requires_begin_and_matching_size() {
    let mut rec = InMemoryRecorder::new();
    let frame = Surface::new(4, 2).unwrap();
    assert!(matches!(rec.push_frame(0, &frame), Err(StoryError::Encoding(_))));
    rec.begin(&cfg()).unwrap();
    let wrong = Surface::new(2, 2).unwrap();
    assert!(matches!(rec.push_frame(0, &wrong), Err(StoryError::Validation(_))));
}
