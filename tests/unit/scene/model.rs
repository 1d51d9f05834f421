use super::*;

const SLIDE_JSON: &str = r##"{
  "media": { "url": "media/beach.jpg", "type": "photo" },
  "texts": [
    { "id": "t1", "text": "hello", "font": "classic", "color": "#ffffff",
      "position": { "x": 50.0, "y": 25.0 }, "scale": 1.5, "rotation": 10.0 }
  ],
  "drawings": [
    { "id": "d1", "brush": "pen", "color": "#ff0000",
      "points": [ { "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 } ], "strokeWidth": 6.0 },
    { "id": "d2", "brush": "eraser", "color": "erase",
      "points": [ { "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 } ], "strokeWidth": 12.0 }
  ],
  "filter": "brightness(1.2) contrast(1.4)",
  "filterIntensity": 0.5,
  "effects": { "vignette": 0.3, "tiltShift": { "mode": "radial", "intensity": 0.4 } }
}"##;

#[test]
fn slide_json_round_trips_editing_state() {
    let slide = StorySlide::from_json_str(SLIDE_JSON).unwrap();
    assert_eq!(slide.media.kind, MediaKind::Photo);
    assert_eq!(slide.texts[0].scale, 1.5);
    assert_eq!(slide.texts[0].position.x, 50.0);
    assert_eq!(slide.drawings.len(), 2);
    assert!(!slide.drawings[0].is_erase());
    assert!(slide.drawings[1].is_erase());
    assert_eq!(slide.filter_intensity, 0.5);
    assert_eq!(slide.effects.vignette, 0.3);
    assert_eq!(slide.effects.grain, 0.0);
    assert_eq!(slide.effects.tilt_shift.mode, TiltShiftMode::Radial);
    assert!(slide.stickers.is_empty());
    slide.validate().unwrap();
}

#[test]
fn defaults_fill_missing_fields() {
    let slide =
        StorySlide::from_json_str(r#"{ "media": { "url": "clip.mp4", "type": "video" } }"#).unwrap();
    assert_eq!(slide.media.kind, MediaKind::Video);
    assert_eq!(slide.filter, None);
    assert_eq!(slide.filter_intensity, 1.0);
    assert_eq!(slide.effects, StoryEffects::default());
}

#[test]
fn erase_sentinel_marks_pen_strokes_as_erasers() {
    let d = DrawingElement {
        id: "x".into(),
        brush: Brush::Pen,
        color: "erase".into(),
        points: Vec::new(),
        stroke_width: 4.0,
    };
    assert!(d.is_erase());
}

#[test]
fn effects_clamp_into_unit_range() {
    let e = StoryEffects {
        grain: 2.0,
        vignette: -1.0,
        glow: 0.5,
        blur: f64::NAN,
        tilt_shift: TiltShift {
            mode: TiltShiftMode::Linear,
            intensity: 9.0,
        },
    }
    .clamped();
    assert_eq!(e.grain, 1.0);
    assert_eq!(e.vignette, 0.0);
    assert_eq!(e.glow, 0.5);
    assert_eq!(e.blur, 0.0);
    assert_eq!(e.tilt_shift.intensity, 1.0);
}

#[test]
fn validate_rejects_non_finite_text_placement() {
    let mut slide = StorySlide::new(MediaReference::photo("a.png"));
    slide.texts.push(TextElement {
        id: "t".into(),
        text: "x".into(),
        font: String::new(),
        color: "#fff".into(),
        position: Point::new(f64::NAN, 0.0),
        scale: 1.0,
        rotation: 0.0,
    });
    assert!(slide.validate().is_err());
}

#[test]
fn invalid_json_is_a_validation_error() {
    let err = StorySlide::from_json_str("{").unwrap_err();
    assert!(matches!(err, StoryError::Validation(_)));
}
