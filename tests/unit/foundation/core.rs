use super::*;

#[test]
fn clamp01_stays_in_unit_range() {
    for x in [-1e9, -1.0, -0.0, 0.0, 0.25, 1.0, 1.5, 1e9, f64::INFINITY, f64::NEG_INFINITY] {
        let c = clamp01(x);
        assert!((0.0..=1.0).contains(&c), "clamp01({x}) = {c}");
    }
    assert_eq!(clamp01(f64::NAN), 0.0);
}

#[test]
fn clamp01_is_idempotent() {
    for x in [-3.0, 0.0, 0.3333, 0.999, 1.0, 42.0] {
        assert_eq!(clamp01(clamp01(x)), clamp01(x));
    }
}

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(1080, 1920).unwrap();
    assert_eq!(c, Canvas::STORY);
    assert_eq!(c.byte_len(), 1080 * 1920 * 4);
}

#[test]
fn premul_from_straight_rounds() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
