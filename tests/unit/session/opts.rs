use super::*;

#[test]
fn defaults_match_story_output() {
    let o = RenderOpts::default();
    assert_eq!((o.width, o.height), (1080, 1920));
    assert_eq!(o.thumbnail_size, 640);
    assert_eq!(o.image_quality, 0.92);
    assert_eq!(o.thumbnail_quality, 0.8);
    assert_eq!(o.codec, VideoCodec::Vp9Webm);
    assert_eq!(o.fps, 30);
    o.validate().unwrap();
}

#[test]
fn json_overrides_only_named_fields() {
    let o: RenderOpts =
        serde_json::from_str(r#"{"width": 540, "height": 960, "codec": "h264_mp4"}"#).unwrap();
    assert_eq!((o.width, o.height), (540, 960));
    assert_eq!(o.codec, VideoCodec::H264Mp4);
    assert_eq!(o.thumbnail_size, 640);
}

#[test]
fn from_json_path_reads_file_and_reports_bad_json() {
    let dir = std::env::temp_dir().join(format!("storyframe-opts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.json");
    std::fs::write(&good, r#"{"fps": 24}"#).unwrap();
    assert_eq!(RenderOpts::from_json_path(&good).unwrap().fps, 24);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{").unwrap();
    assert!(matches!(
        RenderOpts::from_json_path(&bad).unwrap_err(),
        StoryError::Validation(_)
    ));
    assert!(RenderOpts::from_json_path(dir.join("missing.json")).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn overrides_apply_and_ignore_garbage() {
    let vars: BTreeMap<&str, &str> = [
        ("STORYFRAME_FPS", "24"),
        ("STORYFRAME_CODEC", "mp4"),
        ("STORYFRAME_IMAGE_QUALITY", "lots"),
        ("STORYFRAME_GRAIN_SEED", "42"),
        ("STORYFRAME_FONT", "/fonts/a.ttf"),
    ]
    .into_iter()
    .collect();
    let o = RenderOpts::default().with_overrides_from(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(o.fps, 24);
    assert_eq!(o.codec, VideoCodec::H264Mp4);
    assert_eq!(o.image_quality, 0.92);
    assert_eq!(o.grain_seed, 42);
    assert_eq!(o.font, Some(PathBuf::from("/fonts/a.ttf")));
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad = [
        RenderOpts { width: 0, ..RenderOpts::default() },
        RenderOpts { thumbnail_size: 0, ..RenderOpts::default() },
        RenderOpts { image_quality: 0.0, ..RenderOpts::default() },
        RenderOpts { thumbnail_quality: 1.5, ..RenderOpts::default() },
        RenderOpts { fps: 0, ..RenderOpts::default() },
    ];
    for o in bad {
        assert!(matches!(o.validate(), Err(StoryError::Validation(_))), "{o:?}");
    }
}

#[test]
fn missing_font_file_fails_to_load() {
    let o = RenderOpts {
        font: Some(PathBuf::from("/definitely/missing/font.ttf")),
        ..RenderOpts::default()
    };
    assert!(o.load_fonts().is_err());
    assert!(!RenderOpts::default().load_fonts().unwrap().has_default());
}
