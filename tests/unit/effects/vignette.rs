use super::*;
use crate::foundation::core::Rgba8Premul;

fn gray(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    s.fill(Rgba8Premul::from_straight_rgba(200, 200, 200, 255));
    s
}

#[test]
fn gradient_is_clear_in_center_and_dark_in_corners() {
    let l = vignette_layer(100, 200).unwrap();
    assert_eq!(l.pixel(50, 100).unwrap()[3], 0);
    assert!(l.pixel(0, 0).unwrap()[3] > 100);
    assert!(l.pixel(0, 0).unwrap()[3] > l.pixel(25, 50).unwrap()[3]);
}

#[test]
fn zero_intensity_is_noop() {
    let orig = gray(20, 40);
    let mut s = orig.clone();
    apply_vignette(&mut s, 0.0).unwrap();
    assert_eq!(s, orig);
}

#[test]
fn corners_darken_more_with_intensity() {
    let mut weak = gray(100, 200);
    let mut strong = gray(100, 200);
    apply_vignette(&mut weak, 0.3).unwrap();
    apply_vignette(&mut strong, 1.0).unwrap();
    let w = weak.pixel(0, 0).unwrap()[0];
    let s = strong.pixel(0, 0).unwrap()[0];
    assert!(s < w && w < 200, "weak {w} strong {s}");
    assert_eq!(strong.pixel(50, 100), Some([200, 200, 200, 255]));
    assert_eq!(strong.pixel(0, 0).unwrap()[3], 255);
}
